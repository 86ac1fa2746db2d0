use anyhow::{Result, anyhow};
use std::path::PathBuf;
use std::process::Command;
use tracing::info;

/// Install locations checked after the configured path and PATH.
const COMMON_PATHS: [&str; 5] = [
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
];

/// Finds the Tesseract executable: the configured path first, then PATH, then
/// common install locations.
pub fn find_tesseract_executable(configured: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = configured {
        let p = PathBuf::from(path);
        if p.exists() {
            info!("Using configured Tesseract at: {}", p.display());
            return Ok(p);
        }
        return Err(anyhow!("Configured Tesseract not found: {}", path));
    }

    // Check PATH
    if let Ok(output) = Command::new("tesseract").arg("--version").output() {
        if output.status.success() {
            info!("Found Tesseract in system PATH");
            return Ok(PathBuf::from("tesseract"));
        }
    }

    for path in &COMMON_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            info!("Found Tesseract at: {}", p.display());
            return Ok(p);
        }
    }

    Err(anyhow!(
        "Tesseract not found. Install Tesseract-OCR or set tesseract_path in config.json."
    ))
}

/// Finds a tessdata directory from `TESSDATA_PREFIX`, if one is set and usable.
///
/// Returns `None` when Tesseract should use its compiled-in default.
pub fn find_tessdata_dir() -> Option<PathBuf> {
    let prefix = PathBuf::from(std::env::var_os("TESSDATA_PREFIX")?);
    [prefix.clone(), prefix.join("tessdata")]
        .into_iter()
        .find(|p| p.join("eng.traineddata").exists())
}
