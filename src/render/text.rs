//! Bar text: segment building, width estimation and placement.

use regex::Regex;
use std::sync::LazyLock;

use super::surface::TextPrimitive;
use crate::stats::StatKind;
use crate::style::{Rgba8, TextAlign};

/// Font name passed to the drawing surface.
pub const TEXT_FONT: &str = "Arial";

/// Average glyph advance as a fraction of the font size.
const GLYPH_ASPECT: f64 = 0.6;

/// Extra space between adjacent segments.
const SEGMENT_SPACING: i32 = 2;

const SHADOW_COLOR: Rgba8 = Rgba8::new(0, 0, 0, 180);

static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{current\}|\{max\}|\{diff\}").ok());

/// A run of text drawn in one color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    /// Drawn in the overcap color instead of the normal text color.
    pub highlight: bool,
}

impl TextSegment {
    fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: false,
        }
    }
}

/// `current/max`, or `current%` for Adrenaline.
pub fn standard_text(kind: StatKind, current: u32, max: u32) -> String {
    match kind {
        StatKind::Adrenaline => format!("{}%", current),
        _ => format!("{}/{}", current, max),
    }
}

/// Expands an overcap template into segments. Returns `None` when the template
/// has no `{current}` placeholder.
///
/// `{current}` and `{diff}` get segments of their own. `{max}` joins the
/// literal text around it.
pub fn overcap_segments(template: &str, current: u32, max: u32) -> Option<Vec<TextSegment>> {
    let placeholder = PLACEHOLDER.as_ref()?;
    let diff = current.saturating_sub(max);
    let mut segments = Vec::new();
    let mut pending = String::new();
    let mut last = 0;

    for m in placeholder.find_iter(template) {
        pending.push_str(&template[last..m.start()]);
        last = m.end();
        let segment = match m.as_str() {
            "{max}" => {
                pending.push_str(&max.to_string());
                continue;
            }
            "{current}" => TextSegment {
                text: current.to_string(),
                highlight: true,
            },
            _ => TextSegment::normal(diff.to_string()),
        };
        if !pending.is_empty() {
            segments.push(TextSegment::normal(std::mem::take(&mut pending)));
        }
        segments.push(segment);
    }
    pending.push_str(&template[last..]);
    if !pending.is_empty() {
        segments.push(TextSegment::normal(pending));
    }

    segments.iter().any(|s| s.highlight).then_some(segments)
}

/// Segments for a bar's reading.
pub fn bar_segments(kind: StatKind, current: u32, max: u32, overcap_template: &str) -> Vec<TextSegment> {
    if current > max {
        if let Some(segments) = overcap_segments(overcap_template, current, max) {
            return segments;
        }
    }
    vec![TextSegment::normal(standard_text(kind, current, max))]
}

/// Estimated rendered width of monospace text.
pub fn measure(text: &str, font_size: u32) -> i32 {
    round_half_up(text.chars().count() as f64 * font_size as f64 * GLYPH_ASPECT)
}

/// Rounds halves toward positive infinity.
pub fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

#[derive(Clone, Copy, Debug)]
pub struct TextStyle {
    pub font_size: u32,
    pub align: TextAlign,
    pub color: Rgba8,
    pub highlight: Rgba8,
    pub shadow: bool,
}

/// Places segments inside the usable width of a bar (2px inset each side).
///
/// Each segment becomes one centered text primitive, preceded by a shadow copy
/// offset by one pixel when shadows are enabled.
pub fn layout_segments(
    segments: &[TextSegment],
    bar_x: i32,
    bar_width: i32,
    y: i32,
    style: &TextStyle,
) -> Vec<TextPrimitive> {
    let total: i32 = segments.iter().map(|s| measure(&s.text, style.font_size)).sum();

    let left = bar_x as f64 + 2.0;
    let usable = bar_width as f64 - 4.0;
    let half = total as f64 / 2.0;
    let center = match style.align {
        TextAlign::Left => left + half,
        TextAlign::Center => left + usable / 2.0,
        TextAlign::Right => left + usable - half,
    };
    let mut cursor = round_half_up(center - half);

    let mut primitives = Vec::with_capacity(segments.len() * 2);
    for segment in segments {
        let width = measure(&segment.text, style.font_size);
        let center_x = round_half_up(cursor as f64 + width as f64 / 2.0);
        let color = if segment.highlight {
            style.highlight
        } else {
            style.color
        };

        let primitive = TextPrimitive {
            text: segment.text.clone(),
            color: color.to_argb(),
            font_size: style.font_size,
            x: center_x,
            y,
            font: TEXT_FONT,
            centered: true,
            shadow: style.shadow,
        };
        if style.shadow {
            primitives.push(TextPrimitive {
                color: SHADOW_COLOR.to_argb(),
                x: center_x + 1,
                y: y + 1,
                ..primitive.clone()
            });
        }
        primitives.push(primitive);
        cursor += width + SEGMENT_SPACING;
    }
    primitives
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);
    const GOLD: Rgba8 = Rgba8::new(255, 200, 0, 255);

    fn style(align: TextAlign, shadow: bool) -> TextStyle {
        TextStyle {
            font_size: 10,
            align,
            color: WHITE,
            highlight: GOLD,
            shadow,
        }
    }

    #[test]
    fn test_overcap_segments() {
        let segments = overcap_segments("{current}/{max} (+{diff})", 150, 100).unwrap();
        let texts: Vec<(&str, bool)> = segments
            .iter()
            .map(|s| (s.text.as_str(), s.highlight))
            .collect();
        assert_eq!(
            texts,
            vec![("150", true), ("/100 (+", false), ("50", false), (")", false)]
        );
    }

    #[test]
    fn test_overcap_max_joins_literal_text() {
        let segments = overcap_segments("{max}+{diff} over, now {current}", 120, 99).unwrap();
        assert_eq!(
            segments,
            vec![
                TextSegment::normal("99+"),
                TextSegment::normal("21"),
                TextSegment::normal(" over, now "),
                TextSegment {
                    text: "120".to_string(),
                    highlight: true,
                },
            ]
        );
    }

    #[test]
    fn test_overcap_without_current_falls_back() {
        assert_eq!(overcap_segments("{max} (+{diff})", 150, 100), None);

        let segments = bar_segments(StatKind::Hp, 150, 100, "+{diff}");
        assert_eq!(segments, vec![TextSegment::normal("150/100")]);
    }

    #[test]
    fn test_standard_text() {
        assert_eq!(standard_text(StatKind::Prayer, 600, 990), "600/990");
        assert_eq!(standard_text(StatKind::Adrenaline, 35, 100), "35%");
        assert_eq!(
            bar_segments(StatKind::Hp, 80, 100, "{current}!"),
            vec![TextSegment::normal("80/100")],
            "no overcap, no template"
        );
    }

    #[test]
    fn test_measure() {
        assert_eq!(measure("8500/9900", 12), 65); // 9 * 12 * 0.6 = 64.8
        assert_eq!(measure("", 12), 0);
    }

    #[test]
    fn test_center_alignment_with_shadow() {
        // "50%" at 10px: width 18; bar inner spans 102..=198, centre 150
        let prims = layout_segments(
            &[TextSegment::normal("50%")],
            100,
            100,
            40,
            &style(TextAlign::Center, true),
        );
        assert_eq!(prims.len(), 2);
        assert_eq!((prims[0].x, prims[0].y), (151, 41), "shadow first, offset by one");
        assert_eq!(prims[0].color, 0xb4000000);
        assert_eq!((prims[1].x, prims[1].y), (150, 40));
        assert_eq!(prims[1].color, 0xffffffff);
        assert!(prims[1].centered);
    }

    #[test]
    fn test_left_and_right_alignment() {
        let segs = [TextSegment::normal("50%")];
        let left = layout_segments(&segs, 100, 100, 0, &style(TextAlign::Left, false));
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].x, 102 + 9);

        let right = layout_segments(&segs, 100, 100, 0, &style(TextAlign::Right, false));
        assert_eq!(right[0].x, 198 - 9);
    }

    #[test]
    fn test_segments_advance_with_spacing() {
        let segments = overcap_segments("{current}/{max}", 150, 100).unwrap();
        let prims = layout_segments(&segments, 0, 200, 0, &style(TextAlign::Left, false));
        // widths: "150" 18, "/100" 24
        assert_eq!(prims[0].x, 2 + 9);
        assert_eq!(prims[0].color, GOLD.to_argb());
        assert_eq!(prims[1].x, 2 + 18 + 2 + 12);
        assert_eq!(prims[1].color, WHITE.to_argb());
    }
}
