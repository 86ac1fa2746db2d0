//! Turns raw OCR text into numbers.

use crate::error::ParseError;

/// Returns true for characters that decorate a number without changing it:
/// thousands separators, whitespace, percent and plus signs.
fn is_decoration(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '.' | '\'' | '%' | '+')
}

/// Parses a single number, removing separators, whitespace and decoration.
///
/// Anything else left over (letters, stray symbols) is a parse failure rather than
/// being silently dropped, so a garbled read never produces a wrong value.
pub fn parse_number(text: &str) -> Result<u32, ParseError> {
    let digits: String = text.chars().filter(|c| !is_decoration(*c)).collect();

    if digits.is_empty() {
        return Err(ParseError::Empty);
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::Invalid(text.to_string()));
    }

    digits
        .parse::<u32>()
        .map_err(|_| ParseError::Invalid(text.to_string()))
}

/// Result of reading a `current/max` line. Each side parses independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FractionRead {
    pub current: Option<u32>,
    pub max: Option<u32>,
}

impl FractionRead {
    pub fn is_complete(&self) -> bool {
        self.current.is_some() && self.max.is_some()
    }

    pub fn parsed_fields(&self) -> usize {
        self.current.is_some() as usize + self.max.is_some() as usize
    }
}

/// Parses text of the form `current/max`, e.g. `"9,870/ 10,000"`.
pub fn parse_fraction(text: &str) -> FractionRead {
    let mut parts = text.splitn(2, '/');
    let current = parts.next().and_then(|s| parse_number(s).ok());
    let max = parts.next().and_then(|s| parse_number(s).ok());
    FractionRead { current, max }
}

/// Parses a percentage such as `"87%"`, clamped to 0..=100.
pub fn parse_percent(text: &str) -> Option<u32> {
    parse_number(text).ok().map(|v| v.min(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1,234"), Ok(1234));
        assert_eq!(parse_number(" 1 234 "), Ok(1234));
        assert_eq!(parse_number("12.345"), Ok(12345));
        assert_eq!(parse_number("87%"), Ok(87));
        assert_eq!(parse_number("0"), Ok(0));
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert_eq!(parse_number(""), Err(ParseError::Empty));
        assert_eq!(parse_number(" , "), Err(ParseError::Empty));
        assert!(matches!(parse_number("12a4"), Err(ParseError::Invalid(_))));
        assert!(matches!(
            parse_number("99999999999"),
            Err(ParseError::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(
            parse_fraction("9,870/10,000"),
            FractionRead {
                current: Some(9870),
                max: Some(10000)
            }
        );
        assert_eq!(
            parse_fraction("990 / 990"),
            FractionRead {
                current: Some(990),
                max: Some(990)
            }
        );
    }

    #[test]
    fn test_parse_fraction_sides_are_independent() {
        let read = parse_fraction("1,234/");
        assert_eq!(read.current, Some(1234));
        assert_eq!(read.max, None);
        assert!(!read.is_complete());

        let read = parse_fraction("x/850");
        assert_eq!(read.current, None);
        assert_eq!(read.max, Some(850));

        assert_eq!(parse_fraction("").parsed_fields(), 0);
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("45%"), Some(45));
        assert_eq!(parse_percent("100 %"), Some(100));
        assert_eq!(parse_percent("250%"), Some(100));
        assert_eq!(parse_percent("%"), None);
    }
}
