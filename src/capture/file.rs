//! Capture provider backed by an image file.
//!
//! An external grabber keeps overwriting the frame file; every capture re-reads it
//! so the pipeline always sees the newest frame.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{CaptureProvider, Raster, Rect, crop_rect};
use crate::error::CaptureError;

pub struct FileCapture {
    path: PathBuf,
}

impl FileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_frame(&self) -> Result<Raster, CaptureError> {
        if !self.path.exists() {
            return Err(CaptureError::Unavailable(format!(
                "frame file {} does not exist",
                self.path.display()
            )));
        }
        let img = match image::open(&self.path) {
            Ok(img) => img.to_rgba8(),
            Err(image::ImageError::IoError(e)) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(CaptureError::PermissionDenied);
            }
            Err(e) => return Err(e.into()),
        };
        debug!(
            "Read frame {}x{} from {}",
            img.width(),
            img.height(),
            self.path.display()
        );
        Ok(img)
    }
}

impl CaptureProvider for FileCapture {
    fn capture_full(&mut self) -> Result<Raster, CaptureError> {
        self.read_frame()
    }

    fn capture_region(&mut self, rect: Rect) -> Result<Raster, CaptureError> {
        let full = self.read_frame()?;
        Ok(crop_rect(&full, rect))
    }
}
