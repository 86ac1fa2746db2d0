//! Combat stat overlay.
//!
//! Finds the game's stat icons in captured frames, narrows capture to the stat
//! panel, reads the numbers next to each icon and redraws them as configurable
//! bars on an overlay drawing surface.

pub mod capture;
pub mod config;
pub mod detection;
pub mod error;
pub mod logging;
pub mod ocr;
pub mod paths;
pub mod pipeline;
pub mod render;
pub mod stats;
pub mod style;
