use std::path::PathBuf;
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Name of the single persisted style slot.
pub const STYLE_SLOT: &str = "combat-overlay-settings.json";

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the icon directory: `<exe_dir>/resources/icons/`
///
/// Holds the six stat icons used both as detection templates and overlay images.
pub fn get_icons_dir() -> PathBuf {
    get_exe_dir().join("resources").join("icons")
}

/// Returns the per-user settings directory: `<config_dir>/combat-bars/`
pub fn get_settings_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| get_exe_dir().clone())
        .join("combat-bars")
}

/// Returns the path of the persisted style slot.
pub fn get_style_path() -> PathBuf {
    get_settings_dir().join(STYLE_SLOT)
}

/// Ensures all output directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    std::fs::create_dir_all(get_settings_dir())?;
    Ok(())
}
