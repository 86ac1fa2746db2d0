//! Runtime configuration.
//!
//! Loads settings from config.json at startup. Provides capture cadence,
//! region margins, OCR box placement and overlay timing. The pixel offsets are
//! tuned for one display scale and must be adjusted here for others.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{info, warn};

use crate::detection::region_lock::RegionMargins;
use crate::ocr::{FontSpec, OcrBoxOffset};

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Image file the capture provider reads frames from
    #[serde(default = "default_capture_source")]
    pub capture_source: String,
    /// Directory holding the six stat icons (defaults to resources/icons next to the exe)
    #[serde(default)]
    pub icons_dir: Option<String>,
    /// Poll interval while no region is locked (milliseconds)
    #[serde(default = "default_unlocked_poll_ms")]
    pub unlocked_poll_ms: u64,
    /// Poll interval once locked, matched to the game's 0.6s tick (milliseconds)
    #[serde(default = "default_locked_poll_ms")]
    pub locked_poll_ms: u64,
    /// Interval of the redraw that refreshes expiring primitives (milliseconds)
    #[serde(default = "default_keep_alive_ms")]
    pub keep_alive_ms: u64,
    /// Lifetime of each drawn primitive on the surface (milliseconds)
    #[serde(default = "default_primitive_ttl_ms")]
    pub primitive_ttl_ms: u64,
    /// Quiet period before an interactive style edit reaches the renderer (milliseconds)
    #[serde(default = "default_style_debounce_ms")]
    pub style_debounce_ms: u64,
    /// Consecutive unreadable ticks before anchors and region are dropped
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// Margins added around the anchor bounding box
    #[serde(default)]
    pub region_margins: RegionMargins,
    /// Placement of the OCR box relative to each anchor
    #[serde(default)]
    pub ocr_box: OcrBoxOffset,
    /// Text colors accepted by the glyph reader [R, G, B]
    #[serde(default = "default_glyph_colors")]
    pub glyph_colors: Vec<[u8; 3]>,
    /// Per-channel distance still counted as a glyph color
    #[serde(default = "default_glyph_tolerance")]
    pub glyph_tolerance: u8,
    #[serde(default)]
    pub font: FontSpec,
    /// Explicit Tesseract executable; searched on PATH when unset
    #[serde(default)]
    pub tesseract_path: Option<String>,
    /// Prefix of the overlay group id
    #[serde(default = "default_overlay_group")]
    pub overlay_group: String,
    /// When set, draws into a PNG at this path instead of logging primitives
    #[serde(default)]
    pub preview_path: Option<String>,
}

fn default_capture_source() -> String {
    "frame.png".to_string()
}

fn default_unlocked_poll_ms() -> u64 {
    1000
}

fn default_locked_poll_ms() -> u64 {
    600
}

fn default_keep_alive_ms() -> u64 {
    20_000
}

fn default_primitive_ttl_ms() -> u64 {
    30_000
}

fn default_style_debounce_ms() -> u64 {
    150
}

fn default_failure_threshold() -> u32 {
    4
}

fn default_glyph_colors() -> Vec<[u8; 3]> {
    vec![[255, 255, 255]]
}

fn default_glyph_tolerance() -> u8 {
    40
}

fn default_overlay_group() -> String {
    "combat-bars".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capture_source: default_capture_source(),
            icons_dir: None,
            unlocked_poll_ms: default_unlocked_poll_ms(),
            locked_poll_ms: default_locked_poll_ms(),
            keep_alive_ms: default_keep_alive_ms(),
            primitive_ttl_ms: default_primitive_ttl_ms(),
            style_debounce_ms: default_style_debounce_ms(),
            failure_threshold: default_failure_threshold(),
            region_margins: RegionMargins::default(),
            ocr_box: OcrBoxOffset::default(),
            glyph_colors: default_glyph_colors(),
            glyph_tolerance: default_glyph_tolerance(),
            font: FontSpec::default(),
            tesseract_path: None,
            overlay_group: default_overlay_group(),
            preview_path: None,
        }
    }
}

impl AppConfig {
    pub fn unlocked_poll(&self) -> Duration {
        Duration::from_millis(self.unlocked_poll_ms)
    }

    pub fn locked_poll(&self) -> Duration {
        Duration::from_millis(self.locked_poll_ms)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_millis(self.keep_alive_ms)
    }

    pub fn primitive_ttl(&self) -> Duration {
        Duration::from_millis(self.primitive_ttl_ms)
    }

    pub fn style_debounce(&self) -> Duration {
        Duration::from_millis(self.style_debounce_ms)
    }
}

/// Loads configuration from a JSON file, or returns defaults if it is missing or invalid.
pub fn load_config_from(config_path: &Path) -> AppConfig {
    info!("Looking for config at: {}", config_path.display());

    if !config_path.exists() {
        info!("config.json not found. Using default config.");
        return AppConfig::default();
    }

    match fs::read_to_string(config_path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => {
                info!("Config loaded from {}", config_path.display());
                config
            }
            Err(e) => {
                warn!("Failed to parse config.json: {}. Using defaults.", e);
                AppConfig::default()
            }
        },
        Err(e) => {
            warn!("Failed to read config.json: {}. Using defaults.", e);
            AppConfig::default()
        }
    }
}

/// Loads configuration from config.json next to the executable.
fn load_config() -> AppConfig {
    let config_path = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("config.json")))
        .unwrap_or_else(|| Path::new("config.json").to_path_buf());
    load_config_from(&config_path)
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config());
}

/// Returns the global configuration, falling back to defaults if
/// `init_config()` was never called.
pub fn get_config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json"));
        assert_eq!(config.locked_poll_ms, 600);
        assert_eq!(config.failure_threshold, 4);
        assert_eq!(config.region_margins.right, 170);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "locked_poll_ms": 300, "ocr_box": { "dx": 30, "dy": -8, "width": 140, "height": 32 } }"#,
        )
        .unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.locked_poll_ms, 300);
        assert_eq!(config.ocr_box.dx, 30);
        assert_eq!(config.ocr_box.height, 32);
        assert_eq!(config.unlocked_poll_ms, 1000);
        assert_eq!(config.glyph_colors, vec![[255, 255, 255]]);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.keep_alive_ms, 20_000);
    }
}
