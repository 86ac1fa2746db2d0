//! The single persisted style slot.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::descriptor::StyleDescriptor;
use crate::error::StoreError;

/// Reads and writes one serialized [`StyleDescriptor`].
#[derive(Clone, Debug)]
pub struct StyleStore {
    path: PathBuf,
}

impl StyleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored style merged over the defaults.
    ///
    /// A missing slot gives the defaults; an unreadable one is logged and also
    /// gives the defaults.
    pub fn load(&self) -> StyleDescriptor {
        match self.try_load() {
            Ok(Some(style)) => {
                info!("Style loaded from {}", self.path.display());
                style
            }
            Ok(None) => {
                info!("No saved style at {}. Using defaults.", self.path.display());
                StyleDescriptor::default()
            }
            Err(e) => {
                warn!("Failed to load style: {}. Using defaults.", e);
                StyleDescriptor::default()
            }
        }
    }

    fn try_load(&self) -> Result<Option<StyleDescriptor>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    pub fn save(&self, style: &StyleDescriptor) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(style)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
