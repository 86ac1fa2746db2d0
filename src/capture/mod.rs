//! Frame capture for the game client.
//!
//! This module provides:
//! - Pixel geometry shared by detection and rendering (`Point`, `Rect`)
//! - The capture provider contract (`CaptureProvider`)
//! - A file-backed provider for frames written by an external grabber (`FileCapture`)

pub mod file;

use image::{ImageBuffer, Rgba};
use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

pub use file::FileCapture;

/// A captured RGBA frame.
pub type Raster = ImageBuffer<Rgba<u8>, Vec<u8>>;

/// A pixel coordinate in window space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translates by another point's coordinates.
    pub fn offset(self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

/// An axis-aligned rectangle in window space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }
}

/// Supplies rasters of the game window.
///
/// `capture_region` takes window coordinates; the returned raster's (0, 0)
/// corresponds to the rectangle's origin.
pub trait CaptureProvider {
    fn capture_full(&mut self) -> Result<Raster, CaptureError>;
    fn capture_region(&mut self, rect: Rect) -> Result<Raster, CaptureError>;
}

/// Crops a sub-rectangle from a raster using absolute pixel coordinates.
///
/// Negative origins and overhanging sizes are clamped to the image bounds, so the
/// result may be smaller than requested (or empty).
pub fn crop_rect(img: &Raster, rect: Rect) -> Raster {
    let (w, h) = img.dimensions();

    let x0 = (rect.x.max(0) as u32).min(w);
    let y0 = (rect.y.max(0) as u32).min(h);
    let x1 = (rect.right().max(0) as u32).min(w);
    let y1 = (rect.bottom().max(0) as u32).min(h);

    image::imageops::crop_imm(img, x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
        .to_image()
}
