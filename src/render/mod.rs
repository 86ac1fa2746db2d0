//! Overlay rendering.
//!
//! This module provides:
//! - The drawing surface contract and in-process surfaces (`DrawingSurface`)
//! - Bar placement per layout mode and per-bar painting
//! - Memoized solid/gradient bitmaps and asynchronously decoded icons
//! - The change-gated renderer (`OverlayRenderer`)

pub mod compositor;
pub mod icons;
pub mod layout;
pub mod paint;
pub mod preview;
pub mod renderer;
pub mod surface;
pub mod text;

pub use compositor::Compositor;
pub use icons::{FileIconLoader, IconCache, IconLoader};
pub use layout::{BarSlot, plan_slots};
pub use paint::paint_bar;
pub use preview::PreviewSurface;
pub use renderer::{OverlayRenderer, RenderOutcome};
pub use surface::{
    DrawCommand, DrawingSurface, PixelBuffer, Primitive, RecordingSurface, TextPrimitive,
    TraceSurface,
};
