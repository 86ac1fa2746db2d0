//! Solid and gradient bitmaps for bar backgrounds and fills.
//!
//! Both kinds are memoized for the lifetime of the renderer. The number of
//! distinct keys is bounded by the style's sizes and colors.

use image::{ImageBuffer, Rgba};
use std::collections::HashMap;

use super::surface::PixelBuffer;
use crate::style::{GradientOrientation, Rgba8};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    width: u32,
    height: u32,
    from: Rgba8,
    to: Rgba8,
    orientation: GradientOrientation,
}

#[derive(Debug, Default)]
pub struct Compositor {
    solid: HashMap<(u32, u32, Rgba8), PixelBuffer>,
    gradient: HashMap<GradientKey, PixelBuffer>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solid(&mut self, width: u32, height: u32, color: Rgba8) -> PixelBuffer {
        self.solid
            .entry((width, height, color))
            .or_insert_with(|| {
                let img = ImageBuffer::from_pixel(
                    width,
                    height,
                    Rgba([color.r, color.g, color.b, color.a]),
                );
                PixelBuffer::from_rgba(&img)
            })
            .clone()
    }

    /// A linear gradient from `from` at the left (or top) edge to `to` at the
    /// right (or bottom) edge, all four channels interpolated.
    pub fn gradient(
        &mut self,
        width: u32,
        height: u32,
        from: Rgba8,
        to: Rgba8,
        orientation: GradientOrientation,
    ) -> PixelBuffer {
        let key = GradientKey {
            width,
            height,
            from,
            to,
            orientation,
        };
        self.gradient
            .entry(key)
            .or_insert_with(|| {
                let img = ImageBuffer::from_fn(width, height, |x, y| {
                    let t = match orientation {
                        GradientOrientation::Horizontal => ratio(x, width),
                        GradientOrientation::Vertical => ratio(y, height),
                    };
                    Rgba([
                        lerp(from.r, to.r, t),
                        lerp(from.g, to.g, t),
                        lerp(from.b, to.b, t),
                        lerp(from.a, to.a, t),
                    ])
                });
                PixelBuffer::from_rgba(&img)
            })
            .clone()
    }

    /// Number of cached bitmaps.
    pub fn len(&self) -> usize {
        self.solid.len() + self.gradient.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn ratio(pos: u32, extent: u32) -> f64 {
    if extent <= 1 {
        0.0
    } else {
        pos as f64 / (extent - 1) as f64
    }
}

fn lerp(from: u8, to: u8, t: f64) -> u8 {
    (from as f64 + (to as f64 - from as f64) * t).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const RED: Rgba8 = Rgba8::new(255, 0, 0, 255);
    const BLUE: Rgba8 = Rgba8::new(0, 0, 255, 55);

    #[test]
    fn test_solid_is_cached() {
        let mut compositor = Compositor::new();
        let a = compositor.solid(10, 4, RED);
        let b = compositor.solid(10, 4, RED);

        assert!(Arc::ptr_eq(&a.bgra, &b.bgra));
        assert_eq!(compositor.len(), 1);
        assert_eq!(a.bgra.len(), 10 * 4 * 4);
        assert_eq!(a.rgba_at(9, 3), Some([255, 0, 0, 255]));

        compositor.solid(10, 5, RED);
        assert_eq!(compositor.len(), 2);
    }

    #[test]
    fn test_horizontal_gradient_endpoints() {
        let mut compositor = Compositor::new();
        let g = compositor.gradient(5, 2, RED, BLUE, GradientOrientation::Horizontal);

        assert_eq!(g.rgba_at(0, 1), Some([255, 0, 0, 255]));
        assert_eq!(g.rgba_at(4, 0), Some([0, 0, 255, 55]));
        // Midpoint: t = 0.5
        assert_eq!(g.rgba_at(2, 0), Some([128, 0, 128, 155]));
    }

    #[test]
    fn test_vertical_gradient_and_degenerate_sizes() {
        let mut compositor = Compositor::new();
        let g = compositor.gradient(3, 3, RED, BLUE, GradientOrientation::Vertical);
        assert_eq!(g.rgba_at(2, 0), Some([255, 0, 0, 255]));
        assert_eq!(g.rgba_at(0, 2), Some([0, 0, 255, 55]));

        let thin = compositor.gradient(1, 1, RED, BLUE, GradientOrientation::Horizontal);
        assert_eq!(thin.rgba_at(0, 0), Some([255, 0, 0, 255]));

        let key_differs = compositor.gradient(3, 3, RED, BLUE, GradientOrientation::Horizontal);
        assert_ne!(key_differs, g);
        assert_eq!(compositor.len(), 3);
    }
}
