//! Overlay style: colors, the descriptor value type, themes, persistence and
//! the debounced editor.

pub mod color;
pub mod debounce;
pub mod descriptor;
pub mod store;
pub mod theme;

pub use color::{Color, Rgba8, opacity_alpha};
pub use debounce::{StyleEdit, StyleEditor};
pub use descriptor::{
    GradientConfig, GradientOrientation, GradientStops, LayoutMode, Palette, StyleDescriptor,
    StylePatch, TextAlign, TextPosition, ThemeLayout,
};
pub use store::StyleStore;
pub use theme::{CUSTOM_THEME, Theme, built_in_themes, theme_by_name};
