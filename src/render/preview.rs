//! A drawing surface that paints into a PNG.
//!
//! Useful without a host overlay: every frame is composited onto a transparent
//! canvas and written to disk when the frame ends. Text is shown as its
//! estimated bounding box, since no font rasterizer is involved.

use image::{ImageBuffer, Pixel, Rgba, RgbaImage};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use super::surface::{DrawingSurface, PixelBuffer, TextPrimitive};
use super::text::measure;
use crate::capture::Rect;
use crate::error::DrawError;

pub struct PreviewSurface {
    canvas: RgbaImage,
    path: PathBuf,
    group: Option<String>,
}

impl PreviewSurface {
    pub fn new(width: u32, height: u32, path: impl Into<PathBuf>) -> Self {
        Self {
            canvas: ImageBuffer::new(width, height),
            path: path.into(),
            group: None,
        }
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    fn blend_at(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x < self.canvas.width() && y < self.canvas.height() {
            self.canvas.get_pixel_mut(x, y).blend(&color);
        }
    }

    fn outline(&mut self, rect: Rect, color: Rgba<u8>, thickness: u32) {
        let (w, h) = (rect.width as i32, rect.height as i32);
        let t = (thickness.max(1) as i32).min(w.max(h));

        for dy in 0..h {
            for dx in 0..w {
                let edge = dy < t || dy >= h - t || dx < t || dx >= w - t;
                if edge {
                    self.blend_at(rect.x + dx, rect.y + dy, color);
                }
            }
        }
    }
}

fn argb_to_rgba(color: u32) -> Rgba<u8> {
    let [a, r, g, b] = color.to_be_bytes();
    Rgba([r, g, b, a])
}

impl DrawingSurface for PreviewSurface {
    fn set_group(&mut self, id: &str) -> Result<(), DrawError> {
        self.group = Some(id.to_string());
        Ok(())
    }

    fn set_group_z_index(&mut self, id: &str, z: i32) -> Result<(), DrawError> {
        debug!("Preview ignores z-index {} for {}", z, id);
        Ok(())
    }

    fn clear_group(&mut self, id: &str) -> Result<(), DrawError> {
        if self.group.as_deref().is_none_or(|g| g == id) {
            self.canvas = ImageBuffer::new(self.canvas.width(), self.canvas.height());
        }
        Ok(())
    }

    fn draw_image(
        &mut self,
        x: i32,
        y: i32,
        image: &PixelBuffer,
        _ttl: Duration,
    ) -> Result<(), DrawError> {
        for py in 0..image.height {
            for px in 0..image.width {
                if let Some(rgba) = image.rgba_at(px, py) {
                    self.blend_at(x + px as i32, y + py as i32, Rgba(rgba));
                }
            }
        }
        Ok(())
    }

    fn draw_rect(
        &mut self,
        color: u32,
        rect: Rect,
        _ttl: Duration,
        thickness: u32,
    ) -> Result<(), DrawError> {
        self.outline(rect, argb_to_rgba(color), thickness);
        Ok(())
    }

    fn draw_text(&mut self, text: &TextPrimitive, _ttl: Duration) -> Result<(), DrawError> {
        let width = measure(&text.text, text.font_size);
        let height = text.font_size as i32;
        let x = if text.centered { text.x - width / 2 } else { text.x };
        let rect = Rect::new(x, text.y - height / 2, width.max(0) as u32, height.max(0) as u32);
        self.outline(rect, argb_to_rgba(text.color), 1);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), DrawError> {
        self.canvas.save(&self.path).map_err(|e| {
            warn!("Failed to write preview {}: {}", self.path.display(), e);
            DrawError::Rejected(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TTL: Duration = Duration::from_secs(1);

    #[test]
    fn test_draw_rect_outline() {
        let mut surface = PreviewSurface::new(100, 100, "unused.png");
        surface
            .draw_rect(0xff00ff00, Rect::new(10, 10, 50, 30), TTL, 2)
            .unwrap();

        assert_eq!(*surface.canvas().get_pixel(10, 10), Rgba([0, 255, 0, 255]));
        assert_eq!(*surface.canvas().get_pixel(59, 39), Rgba([0, 255, 0, 255]));
        assert_eq!(*surface.canvas().get_pixel(11, 11), Rgba([0, 255, 0, 255]));
        // Interior untouched
        assert_eq!(*surface.canvas().get_pixel(35, 25), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_images_are_clipped_and_cleared() {
        let mut surface = PreviewSurface::new(4, 4, "unused.png");
        let block = PixelBuffer::from_rgba(&ImageBuffer::from_pixel(3, 3, Rgba([9, 9, 9, 255])));
        surface.set_group("g").unwrap();
        surface.draw_image(-1, 2, &block, TTL).unwrap();

        assert_eq!(*surface.canvas().get_pixel(0, 2), Rgba([9, 9, 9, 255]));
        assert_eq!(*surface.canvas().get_pixel(1, 3), Rgba([9, 9, 9, 255]));
        assert_eq!(*surface.canvas().get_pixel(2, 2), Rgba([0, 0, 0, 0]));

        surface.clear_group("other").unwrap();
        assert_eq!(*surface.canvas().get_pixel(0, 2), Rgba([9, 9, 9, 255]));
        surface.clear_group("g").unwrap();
        assert_eq!(*surface.canvas().get_pixel(0, 2), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_end_frame_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overlay.png");
        let mut surface = PreviewSurface::new(8, 8, &path);
        surface
            .draw_rect(0xffff0000, Rect::new(0, 0, 8, 8), TTL, 1)
            .unwrap();
        surface.end_frame().unwrap();

        let saved = image::open(&path).unwrap().to_rgba8();
        assert_eq!(*saved.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_end_frame_reports_write_failure() {
        let mut surface = PreviewSurface::new(2, 2, "/nonexistent/dir/overlay.png");
        assert!(matches!(surface.end_frame(), Err(DrawError::Rejected(_))));
    }
}
