//! Built-in themes.
//!
//! A theme replaces the palette and a few stylistic fields of a descriptor. It
//! never touches visibility, position or behavior flags.

use std::sync::LazyLock;

use super::color::Color;
use super::descriptor::{Palette, StyleDescriptor, ThemeLayout};
use crate::stats::StatKind;

/// Theme id meaning "no theme, colors edited by hand".
pub const CUSTOM_THEME: &str = "custom";

pub const CLASSIC_PALETTE: Palette = Palette {
    hp: Color::rgb(0xff, 0x47, 0x57),
    hp_low: Color::rgb(0xff, 0x38, 0x38),
    adrenaline: Color::rgb(0xff, 0xa5, 0x02),
    prayer: Color::rgb(0x53, 0x52, 0xed),
    summoning: Color::rgb(0x2e, 0xd5, 0x73),
    background: Color::rgba(0, 0, 0, 77),
    border: Color::rgba(255, 255, 255, 128),
    text: Color::rgb(0xff, 0xff, 0xff),
};

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub colors: Palette,
    pub opacity: Option<f64>,
    pub font_size: Option<u32>,
    pub bar_height: Option<u32>,
    pub bar_width: Option<u32>,
    pub layout: Option<ThemeLayout>,
}

impl Theme {
    /// Returns a copy of `base` restyled by this theme.
    pub fn apply(&self, base: &StyleDescriptor) -> StyleDescriptor {
        StyleDescriptor {
            theme: Some(self.name.to_string()),
            colors: self.colors,
            opacity: self.opacity.unwrap_or(base.opacity),
            font_size: self.font_size.unwrap_or(base.font_size),
            bar_height: self.bar_height.unwrap_or(base.bar_height),
            bar_width: self.bar_width.unwrap_or(base.bar_width),
            theme_layout: self
                .layout
                .clone()
                .unwrap_or_else(|| base.theme_layout.clone()),
            ..base.clone()
        }
    }
}

fn layout(gap: u32, icon_area_width: u32) -> Option<ThemeLayout> {
    Some(ThemeLayout {
        gap,
        icon_area_width,
        adrenaline_full_width: true,
        order: StatKind::ALL.to_vec(),
    })
}

static BUILT_IN_THEMES: LazyLock<Vec<Theme>> = LazyLock::new(|| {
    vec![
        Theme {
            name: "classic",
            label: "Classic",
            description: "Original combat bars styling",
            colors: CLASSIC_PALETTE,
            opacity: Some(0.9),
            font_size: Some(12),
            bar_height: Some(20),
            bar_width: None,
            layout: layout(8, 20),
        },
        Theme {
            name: "rs-dark",
            label: "Dark",
            description: "Dark muted UI with saturated resource colors",
            colors: Palette {
                hp: Color::rgb(0xd8, 0x34, 0x48),
                hp_low: Color::rgb(0xff, 0x1e, 0x24),
                adrenaline: Color::rgb(0xe0, 0xb3, 0x41),
                prayer: Color::rgb(0x3d, 0x7b, 0xe0),
                summoning: Color::rgb(0x3f, 0xbf, 0x6b),
                background: Color::rgba(20, 20, 25, 140),
                border: Color::rgba(180, 180, 200, 89),
                text: Color::rgb(0xf2, 0xf2, 0xf2),
            },
            opacity: Some(0.85),
            font_size: Some(11),
            bar_height: Some(18),
            bar_width: None,
            layout: layout(6, 18),
        },
        Theme {
            name: "neo",
            label: "Neo (High Contrast)",
            description: "High contrast vibrant theme",
            colors: Palette {
                hp: Color::rgb(0xff, 0x2d, 0x55),
                hp_low: Color::rgb(0xff, 0x00, 0x33),
                adrenaline: Color::rgb(0xff, 0xd6, 0x0a),
                prayer: Color::rgb(0x0a, 0x84, 0xff),
                summoning: Color::rgb(0x30, 0xd1, 0x58),
                background: Color::rgba(0, 0, 0, 128),
                border: Color::rgba(255, 255, 255, 153),
                text: Color::rgb(0xff, 0xff, 0xff),
            },
            opacity: Some(0.95),
            font_size: Some(13),
            bar_height: Some(22),
            bar_width: None,
            layout: layout(8, 22),
        },
        Theme {
            name: "minimal",
            label: "Minimal",
            description: "Subtle transparent background, thin border",
            colors: Palette {
                hp: Color::rgb(0xe7, 0x4c, 0x3c),
                hp_low: Color::rgb(0xff, 0x1e, 0x1e),
                adrenaline: Color::rgb(0xf1, 0xc4, 0x0f),
                prayer: Color::rgb(0x34, 0x98, 0xdb),
                summoning: Color::rgb(0x2e, 0xcc, 0x71),
                background: Color::rgba(0, 0, 0, 38),
                border: Color::rgba(255, 255, 255, 64),
                text: Color::rgb(0xff, 0xff, 0xff),
            },
            opacity: Some(0.8),
            font_size: Some(11),
            bar_height: Some(16),
            bar_width: None,
            layout: layout(4, 16),
        },
    ]
});

pub fn built_in_themes() -> &'static [Theme] {
    &BUILT_IN_THEMES
}

pub fn theme_by_name(name: &str) -> Option<&'static Theme> {
    BUILT_IN_THEMES.iter().find(|t| t.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Point;

    #[test]
    fn test_theme_preserves_visibility_and_position() {
        let base = StyleDescriptor {
            show_summoning: false,
            position: Point::new(10, 20),
            hide_when_full: true,
            ..Default::default()
        };
        let neo = theme_by_name("neo").unwrap();
        let themed = neo.apply(&base);

        assert!(!themed.show_summoning);
        assert_eq!(themed.position, Point::new(10, 20));
        assert!(themed.hide_when_full);

        assert_eq!(themed.colors, neo.colors);
        assert_eq!(themed.opacity, 0.95);
        assert_eq!(themed.font_size, 13);
        assert_eq!(themed.bar_height, 22);
        assert_eq!(themed.bar_width, 150, "neo leaves the width alone");
        assert_eq!(themed.theme.as_deref(), Some("neo"));
        assert_eq!(themed.theme_layout.icon_area_width, 22);
    }

    #[test]
    fn test_classic_matches_defaults() {
        let defaults = StyleDescriptor::default();
        let themed = theme_by_name("classic").unwrap().apply(&defaults);
        assert_eq!(themed, defaults);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(built_in_themes().len(), 4);
        assert!(theme_by_name("rs-dark").is_some());
        assert!(theme_by_name(CUSTOM_THEME).is_none());
    }
}
