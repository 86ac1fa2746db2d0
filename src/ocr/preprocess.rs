use image::{GrayImage, ImageBuffer, Luma, Rgba, imageops};

/// Converts an image to binary by keeping only pixels near an accepted glyph color.
///
/// A pixel whose R, G and B each lie within `tolerance` of one of `colors` becomes
/// black (text). All other pixels become white (background). Tesseract expects dark
/// text on a light background, which is the reverse of the game's rendering.
pub fn mask_glyph_colors(
    img: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    colors: &[[u8; 3]],
    tolerance: u8,
) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let is_glyph = colors
            .iter()
            .any(|c| (0..3).all(|i| pixel[i].abs_diff(c[i]) <= tolerance));
        let value = if is_glyph { 0u8 } else { 255u8 };
        output.put_pixel(x, y, Luma([value]));
    }

    output
}

/// Returns true when a mask produced by [`mask_glyph_colors`] contains any text pixel.
pub fn has_glyph_pixels(mask: &GrayImage) -> bool {
    mask.pixels().any(|p| p[0] == 0)
}

/// Scales a mask up by an integer factor with nearest-neighbour sampling, which
/// keeps the edges of small bitmap digits hard.
pub fn upscale(mask: &GrayImage, factor: u32) -> GrayImage {
    if factor <= 1 {
        return mask.clone();
    }
    let (w, h) = mask.dimensions();
    imageops::resize(mask, w * factor, h * factor, imageops::FilterType::Nearest)
}
