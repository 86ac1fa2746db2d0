use anyhow::{Result, anyhow};
use image::GrayImage;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::debug;

use super::preprocess::{has_glyph_pixels, mask_glyph_colors, upscale};
use super::setup::find_tessdata_dir;
use super::{FontSpec, GlyphReader, OcrLine};
use crate::capture::{Raster, Rect, crop_rect};

/// Glyph height Tesseract reads most reliably, in pixels.
const TARGET_GLYPH_HEIGHT: u32 = 24;

/// Characters the stat lines can contain.
const CHAR_WHITELIST: &str = "0123456789,/%";

/// Reads stat lines by masking glyph colors and running single-line Tesseract.
#[derive(Clone, Debug)]
pub struct TesseractReader {
    executable: PathBuf,
    tessdata: Option<PathBuf>,
    tolerance: u8,
}

impl TesseractReader {
    pub fn new(executable: PathBuf, tolerance: u8) -> Self {
        Self {
            executable,
            tessdata: find_tessdata_dir(),
            tolerance,
        }
    }

    /// Runs Tesseract on a preprocessed mask, returning its raw stdout.
    fn recognize(&self, img: &GrayImage) -> Result<String> {
        // Save image to temporary file
        let temp_input = NamedTempFile::with_suffix(".png")?;
        img.save(temp_input.path())?;

        let mut command = Command::new(&self.executable);
        command.arg(temp_input.path()).arg("stdout");
        if let Some(tessdata) = &self.tessdata {
            command.arg("--tessdata-dir").arg(tessdata);
        }
        let output = command
            .arg("-l")
            .arg("eng")
            .arg("--psm")
            .arg("7") // Single text line
            .arg("-c")
            .arg(format!("tessedit_char_whitelist={}", CHAR_WHITELIST))
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl GlyphReader for TesseractReader {
    fn read_line(
        &self,
        raster: &Raster,
        font: &FontSpec,
        colors: &[[u8; 3]],
        rect: Rect,
    ) -> OcrLine {
        let cropped = crop_rect(raster, rect);
        if cropped.width() == 0 || cropped.height() == 0 {
            return OcrLine::default();
        }

        let mask = mask_glyph_colors(&cropped, colors, self.tolerance);
        if !has_glyph_pixels(&mask) {
            return OcrLine::default();
        }

        let factor = (TARGET_GLYPH_HEIGHT / font.glyph_height.max(1)).max(1);
        match self.recognize(&upscale(&mask, factor)) {
            Ok(stdout) => OcrLine::new(clean_output(&stdout)),
            Err(e) => {
                debug!("OCR read failed for box {:?}: {}", rect, e);
                OcrLine::default()
            }
        }
    }
}

/// Joins Tesseract's output into one line without whitespace.
fn clean_output(stdout: &str) -> String {
    stdout.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn reader() -> TesseractReader {
        TesseractReader::new(PathBuf::from("/nonexistent/tesseract"), 40)
    }

    #[test]
    fn test_clean_output() {
        assert_eq!(clean_output("8,500/9,900\n\x0c"), "8,500/9,900");
        assert_eq!(clean_output(" 45 %\n"), "45%");
        assert_eq!(clean_output(""), "");
    }

    #[test]
    fn test_box_without_glyphs_is_empty() {
        let raster: Raster = ImageBuffer::from_pixel(200, 100, Rgba([20, 20, 20, 255]));
        let line = reader().read_line(
            &raster,
            &FontSpec::default(),
            &[[255, 255, 255]],
            Rect::new(10, 10, 100, 25),
        );
        assert_eq!(line, OcrLine::default());
    }

    #[test]
    fn test_box_outside_raster_is_empty() {
        let raster: Raster = ImageBuffer::from_pixel(50, 50, Rgba([255, 255, 255, 255]));
        let line = reader().read_line(
            &raster,
            &FontSpec::default(),
            &[[255, 255, 255]],
            Rect::new(80, 80, 100, 25),
        );
        assert!(line.text.is_empty());
    }

    #[test]
    fn test_engine_failure_is_empty_line() {
        let raster: Raster = ImageBuffer::from_pixel(50, 50, Rgba([255, 255, 255, 255]));
        let line = reader().read_line(
            &raster,
            &FontSpec::default(),
            &[[255, 255, 255]],
            Rect::new(0, 0, 30, 10),
        );
        assert!(line.text.is_empty());
    }
}
