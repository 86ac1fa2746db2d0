//! Glyph text reading next to each anchored icon.
//!
//! This module provides:
//! - The reader contract (`GlyphReader`) and its inputs (`FontSpec`, box placement)
//! - Color-mask preprocessing that isolates glyph pixels
//! - A Tesseract-backed reader and executable discovery

pub mod engine;
pub mod preprocess;
pub mod setup;

pub use engine::TesseractReader;
pub use preprocess::{mask_glyph_colors, upscale};
pub use setup::find_tesseract_executable;

use serde::{Deserialize, Serialize};

use crate::capture::{Point, Raster, Rect};

/// A single line of text read from a box. Empty when nothing was recognized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OcrLine {
    pub text: String,
}

impl OcrLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The font the stat numbers are rendered in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    pub name: String,
    /// Cap height of a digit in pixels at the target display scale
    pub glyph_height: u32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            name: "aa_8px_mono".to_string(),
            glyph_height: 8,
        }
    }
}

/// Reads a single monospace line of colored glyphs from a box in a raster.
///
/// Reading is best effort: failures yield an empty line, never an error.
pub trait GlyphReader {
    fn read_line(&self, raster: &Raster, font: &FontSpec, colors: &[[u8; 3]], rect: Rect)
    -> OcrLine;
}

/// Placement of the OCR box relative to an anchor.
///
/// Tuned for one display scale; other scales need different values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrBoxOffset {
    pub dx: i32,
    pub dy: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for OcrBoxOffset {
    fn default() -> Self {
        Self {
            dx: 22,
            dy: -5,
            width: 100,
            height: 25,
        }
    }
}

impl OcrBoxOffset {
    /// Box for an anchor in window coordinates, expressed in the coordinates of a
    /// raster whose (0, 0) lies at `raster_origin`.
    pub fn box_for(&self, anchor: Point, raster_origin: Point) -> Rect {
        Rect::new(
            anchor.x - raster_origin.x + self.dx,
            anchor.y - raster_origin.y + self.dy,
            self.width,
            self.height,
        )
    }
}
