//! The full set of user-configurable overlay options.
//!
//! `StyleDescriptor` is a value type. Edits never mutate a shared descriptor in
//! place; they go through [`StyleDescriptor::apply`], which returns a new value.

use serde::{Deserialize, Serialize};

use super::color::Color;
use crate::capture::Point;
use crate::stats::StatKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Horizontal,
    Vertical,
    Compact,
    Minimal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientOrientation {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    #[default]
    Inside,
    Above,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Per-stat colors plus the shared bar chrome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub hp: Color,
    pub hp_low: Color,
    pub adrenaline: Color,
    pub prayer: Color,
    pub summoning: Color,
    pub background: Color,
    pub border: Color,
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        super::theme::CLASSIC_PALETTE
    }
}

impl Palette {
    /// Fill color for a stat. HP switches to `hp_low` when `low` is set.
    pub fn fill(&self, kind: StatKind, low: bool) -> Color {
        match kind {
            StatKind::Hp if low => self.hp_low,
            StatKind::Hp => self.hp,
            StatKind::Prayer => self.prayer,
            StatKind::Summoning => self.summoning,
            StatKind::Adrenaline => self.adrenaline,
        }
    }
}

/// Layout hints a theme supplies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeLayout {
    pub gap: u32,
    pub icon_area_width: u32,
    /// In horizontal mode, Adrenaline gets its own row spanning the other bars.
    pub adrenaline_full_width: bool,
    pub order: Vec<StatKind>,
}

impl Default for ThemeLayout {
    fn default() -> Self {
        Self {
            gap: 8,
            icon_area_width: 20,
            adrenaline_full_width: true,
            order: StatKind::ALL.to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientStops {
    pub from: Color,
    pub to: Color,
}

/// Optional per-stat gradient fills sharing one orientation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    pub orientation: GradientOrientation,
    pub hp: Option<GradientStops>,
    pub adrenaline: Option<GradientStops>,
    pub prayer: Option<GradientStops>,
    pub summoning: Option<GradientStops>,
}

impl GradientConfig {
    pub fn stops(&self, kind: StatKind) -> Option<GradientStops> {
        match kind {
            StatKind::Hp => self.hp,
            StatKind::Adrenaline => self.adrenaline,
            StatKind::Prayer => self.prayer,
            StatKind::Summoning => self.summoning,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDescriptor {
    pub show_hp: bool,
    pub show_adrenaline: bool,
    pub show_prayer: bool,
    pub show_summoning: bool,
    pub show_text: bool,
    pub show_icons: bool,
    pub bar_width: u32,
    pub bar_height: u32,
    pub colors: Palette,
    /// Global opacity in 0..=1, applied to colors without their own alpha
    pub opacity: f64,
    pub font_size: u32,
    /// HP at or below this percentage uses the low-HP color
    pub low_hp_threshold: u32,
    pub position: Point,
    pub layout: LayoutMode,
    pub always_on_top: bool,
    pub hide_when_full: bool,
    /// Applied theme id; `custom` or `None` means no theme
    pub theme: Option<String>,
    pub theme_layout: ThemeLayout,
    pub gradient: Option<GradientConfig>,
    pub text_position: TextPosition,
    pub text_align: TextAlign,
    /// Template used when current exceeds max: `{current}`, `{max}`, `{diff}`
    pub overcap_text_format: String,
    /// Color of the `{current}` segment on overcap; the text color when unset
    pub overcap_text_color: Option<Color>,
    pub text_shadow: bool,
}

impl Default for StyleDescriptor {
    fn default() -> Self {
        Self {
            show_hp: true,
            show_adrenaline: true,
            show_prayer: true,
            show_summoning: true,
            show_text: true,
            show_icons: true,
            bar_width: 150,
            bar_height: 20,
            colors: Palette::default(),
            opacity: 0.9,
            font_size: 12,
            low_hp_threshold: 25,
            position: Point::new(100, 100),
            layout: LayoutMode::Horizontal,
            always_on_top: true,
            hide_when_full: false,
            theme: Some("classic".to_string()),
            theme_layout: ThemeLayout::default(),
            gradient: None,
            text_position: TextPosition::Inside,
            text_align: TextAlign::Center,
            overcap_text_format: "{current}/{max} (+{diff})".to_string(),
            overcap_text_color: None,
            text_shadow: true,
        }
    }
}

impl StyleDescriptor {
    pub fn shows(&self, kind: StatKind) -> bool {
        match kind {
            StatKind::Hp => self.show_hp,
            StatKind::Prayer => self.show_prayer,
            StatKind::Summoning => self.show_summoning,
            StatKind::Adrenaline => self.show_adrenaline,
        }
    }

    /// Z-index of the overlay group.
    pub fn z_index(&self) -> i32 {
        if self.always_on_top { 1000 } else { 100 }
    }

    /// Returns a new descriptor with every field the patch sets replaced.
    pub fn apply(&self, patch: &StylePatch) -> StyleDescriptor {
        fn pick<T: Clone>(patched: &Option<T>, current: &T) -> T {
            patched.clone().unwrap_or_else(|| current.clone())
        }

        StyleDescriptor {
            show_hp: pick(&patch.show_hp, &self.show_hp),
            show_adrenaline: pick(&patch.show_adrenaline, &self.show_adrenaline),
            show_prayer: pick(&patch.show_prayer, &self.show_prayer),
            show_summoning: pick(&patch.show_summoning, &self.show_summoning),
            show_text: pick(&patch.show_text, &self.show_text),
            show_icons: pick(&patch.show_icons, &self.show_icons),
            bar_width: pick(&patch.bar_width, &self.bar_width),
            bar_height: pick(&patch.bar_height, &self.bar_height),
            colors: pick(&patch.colors, &self.colors),
            opacity: pick(&patch.opacity, &self.opacity),
            font_size: pick(&patch.font_size, &self.font_size),
            low_hp_threshold: pick(&patch.low_hp_threshold, &self.low_hp_threshold),
            position: pick(&patch.position, &self.position),
            layout: pick(&patch.layout, &self.layout),
            always_on_top: pick(&patch.always_on_top, &self.always_on_top),
            hide_when_full: pick(&patch.hide_when_full, &self.hide_when_full),
            theme: pick(&patch.theme, &self.theme),
            theme_layout: pick(&patch.theme_layout, &self.theme_layout),
            gradient: pick(&patch.gradient, &self.gradient),
            text_position: pick(&patch.text_position, &self.text_position),
            text_align: pick(&patch.text_align, &self.text_align),
            overcap_text_format: pick(&patch.overcap_text_format, &self.overcap_text_format),
            overcap_text_color: pick(&patch.overcap_text_color, &self.overcap_text_color),
            text_shadow: pick(&patch.text_shadow, &self.text_shadow),
        }
    }
}

/// A partial update. Unset fields leave the descriptor unchanged.
///
/// Optional descriptor fields take `Some(None)` to clear them.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StylePatch {
    pub show_hp: Option<bool>,
    pub show_adrenaline: Option<bool>,
    pub show_prayer: Option<bool>,
    pub show_summoning: Option<bool>,
    pub show_text: Option<bool>,
    pub show_icons: Option<bool>,
    pub bar_width: Option<u32>,
    pub bar_height: Option<u32>,
    pub colors: Option<Palette>,
    pub opacity: Option<f64>,
    pub font_size: Option<u32>,
    pub low_hp_threshold: Option<u32>,
    pub position: Option<Point>,
    pub layout: Option<LayoutMode>,
    pub always_on_top: Option<bool>,
    pub hide_when_full: Option<bool>,
    #[serde(deserialize_with = "present")]
    pub theme: Option<Option<String>>,
    pub theme_layout: Option<ThemeLayout>,
    #[serde(deserialize_with = "present")]
    pub gradient: Option<Option<GradientConfig>>,
    pub text_position: Option<TextPosition>,
    pub text_align: Option<TextAlign>,
    pub overcap_text_format: Option<String>,
    #[serde(deserialize_with = "present")]
    pub overcap_text_color: Option<Option<Color>>,
    pub text_shadow: Option<bool>,
}

impl StylePatch {
    /// Merges `later` over `self`; fields set in both take the later value.
    pub fn merge(&mut self, later: StylePatch) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $( if later.$field.is_some() { self.$field = later.$field; } )*
            };
        }
        take!(
            show_hp,
            show_adrenaline,
            show_prayer,
            show_summoning,
            show_text,
            show_icons,
            bar_width,
            bar_height,
            colors,
            opacity,
            font_size,
            low_hp_threshold,
            position,
            layout,
            always_on_top,
            hide_when_full,
            theme,
            theme_layout,
            gradient,
            text_position,
            text_align,
            overcap_text_format,
            overcap_text_color,
            text_shadow,
        );
    }
}

/// A present key (even `null`) becomes `Some(..)`; an absent key stays `None`
/// through `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
