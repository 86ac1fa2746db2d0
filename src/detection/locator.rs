//! Exact-bitmap template search.
//!
//! A template pixel with zero alpha is a wildcard; every other template pixel must
//! match the frame's RGB exactly. Matches are returned in row-major scan order.

use image::{ImageBuffer, Rgba};

use crate::capture::Point;

/// Which of two mutually exclusive templates matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Primary,
    Secondary,
}

/// Matches for a template pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PairMatch {
    pub points: Vec<Point>,
    pub variant: Option<Variant>,
}

impl PairMatch {
    /// The anchor candidate: first match in scan order.
    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn primary_matched(&self) -> bool {
        self.variant == Some(Variant::Primary)
    }
}

/// Returns every position where `template` matches `haystack` pixel for pixel.
pub fn find_subimage(
    haystack: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    template: &ImageBuffer<Rgba<u8>, Vec<u8>>,
) -> Vec<Point> {
    let (hw, hh) = haystack.dimensions();
    let (tw, th) = template.dimensions();
    if tw == 0 || th == 0 || tw > hw || th > hh {
        return Vec::new();
    }

    // Opaque template pixels only; checking the first one rejects most offsets cheaply.
    let opaque: Vec<(u32, u32, [u8; 3])> = template
        .enumerate_pixels()
        .filter(|(_, _, p)| p[3] != 0)
        .map(|(x, y, p)| (x, y, [p[0], p[1], p[2]]))
        .collect();
    let Some(&(fx, fy, first)) = opaque.first() else {
        return Vec::new();
    };

    let mut matches = Vec::new();
    for y in 0..=(hh - th) {
        for x in 0..=(hw - tw) {
            if rgb(haystack, x + fx, y + fy) != first {
                continue;
            }
            let hit = opaque
                .iter()
                .all(|&(tx, ty, color)| rgb(haystack, x + tx, y + ty) == color);
            if hit {
                matches.push(Point::new(x as i32, y as i32));
            }
        }
    }
    matches
}

/// Searches the primary template, and the secondary one only when the primary
/// yields nothing.
pub fn find_pair(
    haystack: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    primary: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    secondary: &ImageBuffer<Rgba<u8>, Vec<u8>>,
) -> PairMatch {
    let points = find_subimage(haystack, primary);
    if !points.is_empty() {
        return PairMatch {
            points,
            variant: Some(Variant::Primary),
        };
    }

    let points = find_subimage(haystack, secondary);
    let variant = (!points.is_empty()).then_some(Variant::Secondary);
    PairMatch { points, variant }
}

fn rgb(img: &ImageBuffer<Rgba<u8>, Vec<u8>>, x: u32, y: u32) -> [u8; 3] {
    let p = img.get_pixel(x, y);
    [p[0], p[1], p[2]]
}
