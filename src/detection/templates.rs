//! The six stat icon bitmaps.
//!
//! The same files serve as detection templates here and as the icons drawn next
//! to each bar by the renderer.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::capture::Raster;
use crate::stats::StatKind;

/// Identifies one icon bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IconKey {
    Hp,
    AdrenalineOn,
    AdrenalineOff,
    PrayerOn,
    PrayerOff,
    Summoning,
}

impl IconKey {
    pub const ALL: [IconKey; 6] = [
        IconKey::Hp,
        IconKey::AdrenalineOn,
        IconKey::AdrenalineOff,
        IconKey::PrayerOn,
        IconKey::PrayerOff,
        IconKey::Summoning,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            IconKey::Hp => "hp.png",
            IconKey::AdrenalineOn => "adrenaline_on.png",
            IconKey::AdrenalineOff => "adrenaline_off.png",
            IconKey::PrayerOn => "prayer_on.png",
            IconKey::PrayerOff => "prayer_off.png",
            IconKey::Summoning => "summoning.png",
        }
    }

    /// Icon shown for a stat given whether its lit variant is active.
    pub fn for_stat(kind: StatKind, active: bool) -> Self {
        match (kind, active) {
            (StatKind::Hp, _) => IconKey::Hp,
            (StatKind::Summoning, _) => IconKey::Summoning,
            (StatKind::Adrenaline, true) => IconKey::AdrenalineOn,
            (StatKind::Adrenaline, false) => IconKey::AdrenalineOff,
            (StatKind::Prayer, true) => IconKey::PrayerOn,
            (StatKind::Prayer, false) => IconKey::PrayerOff,
        }
    }
}

/// Decoded templates for every icon.
#[derive(Clone, Debug)]
pub struct IconTemplates {
    pub hp: Raster,
    pub adrenaline_on: Raster,
    pub adrenaline_off: Raster,
    pub prayer_on: Raster,
    pub prayer_off: Raster,
    pub summoning: Raster,
}

impl IconTemplates {
    /// Loads all six templates from a directory.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let load = |key: IconKey| -> Result<Raster> {
            let path = dir.join(key.file_name());
            let img = image::open(&path)
                .with_context(|| format!("Failed to load icon template {}", path.display()))?;
            Ok(img.to_rgba8())
        };

        let templates = Self {
            hp: load(IconKey::Hp)?,
            adrenaline_on: load(IconKey::AdrenalineOn)?,
            adrenaline_off: load(IconKey::AdrenalineOff)?,
            prayer_on: load(IconKey::PrayerOn)?,
            prayer_off: load(IconKey::PrayerOff)?,
            summoning: load(IconKey::Summoning)?,
        };
        info!("Loaded icon templates from {}", dir.display());
        Ok(templates)
    }

    pub fn get(&self, key: IconKey) -> &Raster {
        match key {
            IconKey::Hp => &self.hp,
            IconKey::AdrenalineOn => &self.adrenaline_on,
            IconKey::AdrenalineOff => &self.adrenaline_off,
            IconKey::PrayerOn => &self.prayer_on,
            IconKey::PrayerOff => &self.prayer_off,
            IconKey::Summoning => &self.summoning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use tempfile::tempdir;

    #[test]
    fn test_load_dir() {
        let dir = tempdir().unwrap();
        for (i, key) in IconKey::ALL.iter().enumerate() {
            let img: Raster = ImageBuffer::from_pixel(3, 2, Rgba([i as u8 * 10, 0, 0, 255]));
            img.save(dir.path().join(key.file_name())).unwrap();
        }

        let templates = IconTemplates::load_dir(dir.path()).unwrap();
        assert_eq!(templates.get(IconKey::PrayerOn).dimensions(), (3, 2));
        assert_eq!(templates.get(IconKey::Summoning).get_pixel(0, 0)[0], 50);
    }

    #[test]
    fn test_load_dir_missing_file() {
        let dir = tempdir().unwrap();
        let err = IconTemplates::load_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("hp.png"));
    }

    #[test]
    fn test_for_stat() {
        assert_eq!(IconKey::for_stat(StatKind::Prayer, false), IconKey::PrayerOff);
        assert_eq!(IconKey::for_stat(StatKind::Adrenaline, true), IconKey::AdrenalineOn);
        assert_eq!(IconKey::for_stat(StatKind::Hp, false), IconKey::Hp);
    }
}
