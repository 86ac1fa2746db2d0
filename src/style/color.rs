//! CSS-style color strings.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// An RGB color with an optional explicit alpha.
///
/// Colors without their own alpha take one from the caller at resolve time,
/// usually derived from the global opacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: Option<u8>,
}

/// A color with every channel resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packs as 0xAARRGGBB, the encoding the drawing surface takes for rects and text.
    pub fn to_argb(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a: Some(a) }
    }

    /// Parses `#rgb`, `#rrggbb`, `rgb(r, g, b)` or `rgba(r, g, b, a)` with `a` in 0..=1.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(hex) = input.strip_prefix('#') {
            return parse_hex(hex);
        }

        let body = input
            .strip_prefix("rgba(")
            .or_else(|| input.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if !(3..=4).contains(&parts.len()) {
            return None;
        }

        let channel = |s: &str| s.parse::<f64>().ok().map(|v| v.round().clamp(0.0, 255.0) as u8);
        let r = channel(parts[0])?;
        let g = channel(parts[1])?;
        let b = channel(parts[2])?;
        let a = match parts.get(3) {
            Some(alpha) => {
                let alpha: f64 = alpha.parse().ok()?;
                Some((alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
            }
            None => None,
        };
        Some(Self { r, g, b, a })
    }

    /// Fills in the alpha channel when the color does not carry one.
    pub fn resolve(self, fallback_alpha: u8) -> Rgba8 {
        Rgba8::new(self.r, self.g, self.b, self.a.unwrap_or(fallback_alpha))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digit = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut chans = hex.chars().map(|c| digit(&c.to_string()).map(|v| v * 17));
            Some(Color::rgb(chans.next()??, chans.next()??, chans.next()??))
        }
        6 => Some(Color::rgb(
            digit(hex.get(0..2)?)?,
            digit(hex.get(2..4)?)?,
            digit(hex.get(4..6)?)?,
        )),
        _ => None,
    }
}

impl From<String> for Color {
    /// Unparseable strings become white so a bad settings file still renders.
    fn from(value: String) -> Self {
        Color::parse(&value).unwrap_or_else(|| {
            debug!("Unparseable color {:?}, using white", value);
            Color::WHITE
        })
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        match c.a {
            None => format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b),
            Some(a) => {
                let alpha = (a as f64 / 255.0 * 1000.0).round() / 1000.0;
                format!("rgba({}, {}, {}, {})", c.r, c.g, c.b, alpha)
            }
        }
    }
}

/// Alpha derived from a 0..=1 opacity.
pub fn opacity_alpha(opacity: f64) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}
