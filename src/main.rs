//! Combat Bars
//!
//! Reads HP, Prayer, Summoning and Adrenaline off frames of the game window and
//! redraws them as an overlay. Style edits are typed on stdin.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use combat_bars::capture::FileCapture;
use combat_bars::config::{self, AppConfig};
use combat_bars::detection::{IconTemplates, RegionLock};
use combat_bars::ocr::{TesseractReader, find_tesseract_executable};
use combat_bars::pipeline::{
    OverlayController, Perception, PerceptionSettings, Pipeline, spawn_stdin_reader,
};
use combat_bars::render::{
    DrawingSurface, FileIconLoader, IconCache, OverlayRenderer, PreviewSurface, TraceSurface,
};
use combat_bars::style::{StyleEditor, StyleStore};
use combat_bars::{logging, paths};

/// Canvas size of the PNG preview surface.
const PREVIEW_SIZE: (u32, u32) = (800, 300);

#[tokio::main]
async fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        eprintln!("[PANIC]{} {}", location, msg);
        error!("[PANIC]{} {}", location, msg);
    }));

    paths::ensure_directories().context("Failed to create output directories")?;
    logging::init();
    config::init_config();
    let config = config::get_config();

    info!("Combat Bars starting");
    info!("Type 'status', 'toggle', 'theme <name>', 'set <field> <value>', 'reset' or 'quit'");

    let icons_dir = config
        .icons_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(paths::get_icons_dir);

    match &config.preview_path {
        Some(path) => {
            info!("Drawing overlay frames into {}", path);
            let (width, height) = PREVIEW_SIZE;
            run(config, &icons_dir, PreviewSurface::new(width, height, path)).await
        }
        None => run(config, &icons_dir, TraceSurface::default()).await,
    }
}

async fn run<S: DrawingSurface>(config: &AppConfig, icons_dir: &Path, surface: S) -> Result<()> {
    let templates = IconTemplates::load_dir(icons_dir)?;
    let tesseract = find_tesseract_executable(config.tesseract_path.as_deref())?;
    info!("Using Tesseract at {}", tesseract.display());

    let perception = Perception::new(
        FileCapture::new(&config.capture_source),
        TesseractReader::new(tesseract, config.glyph_tolerance),
        templates,
        RegionLock::new(config.region_margins, config.failure_threshold),
        PerceptionSettings::from(config),
    );

    let store = StyleStore::new(paths::get_style_path());
    let (editor, styles) = StyleEditor::spawn(store.load(), config.style_debounce());

    let renderer = OverlayRenderer::new(
        surface,
        IconCache::new(FileIconLoader::new(icons_dir)),
        config.overlay_group.clone(),
        config.primitive_ttl(),
    );

    Pipeline {
        perception,
        controller: OverlayController::new(renderer),
        editor,
        styles,
        store,
        keep_alive: config.keep_alive(),
    }
    .run(spawn_stdin_reader())
    .await
}
