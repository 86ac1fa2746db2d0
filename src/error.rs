//! Error types for the perception and rendering pipeline.
//!
//! Nothing here is fatal to the process. Capture failures surface through host
//! status, parse failures fall back to the last good value, persistence failures
//! fall back to defaults and draw failures are retried on the next tick.

use thiserror::Error;

/// Failure to obtain a raster from the capture provider.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The host has not granted screen-reading capability.
    #[error("screen capture permission not granted")]
    PermissionDenied,
    #[error("capture source unavailable: {0}")]
    Unavailable(String),
    #[error("failed to decode captured frame: {0}")]
    Image(#[from] image::ImageError),
}

/// OCR text that could not be turned into a number.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no digits in OCR text")]
    Empty,
    #[error("unexpected characters in OCR text: {0:?}")]
    Invalid(String),
}

/// Failure to read or write the persisted style slot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("style store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("style store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failure reported by the overlay drawing surface.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error("drawing surface unavailable")]
    Unavailable,
    #[error("drawing surface rejected primitive: {0}")]
    Rejected(String),
}

/// Failure to decode an icon bitmap.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("failed to decode icon {source_name}: {message}")]
    Decode { source_name: String, message: String },
    #[error("icon decode task failed: {0}")]
    Join(String),
}
