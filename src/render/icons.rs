//! Asynchronous, memoized icon decoding.
//!
//! Each icon is decoded at most once, on a blocking worker. Concurrent requests
//! for the same icon wait on the same decode; requests for different icons do
//! not wait on each other. A failed decode is remembered as missing.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::surface::PixelBuffer;
use crate::detection::IconKey;
use crate::error::IconError;

/// Decodes an icon. Runs on a blocking thread.
pub trait IconLoader: Send + Sync + 'static {
    fn load(&self, key: IconKey) -> Result<image::RgbaImage, IconError>;
}

/// Loads icons from PNG files in a directory.
#[derive(Clone, Debug)]
pub struct FileIconLoader {
    dir: PathBuf,
}

impl FileIconLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl IconLoader for FileIconLoader {
    fn load(&self, key: IconKey) -> Result<image::RgbaImage, IconError> {
        let path = self.dir.join(key.file_name());
        image::open(&path)
            .map(|img| img.to_rgba8())
            .map_err(|e| IconError::Decode {
                source_name: path.display().to_string(),
                message: e.to_string(),
            })
    }
}

type Slot = Arc<OnceCell<Option<PixelBuffer>>>;

pub struct IconCache<L: IconLoader> {
    loader: Arc<L>,
    slots: Mutex<HashMap<IconKey, Slot>>,
}

impl<L: IconLoader> IconCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader: Arc::new(loader),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the icon, decoding it on first use. `None` if it cannot be decoded.
    pub async fn get(&self, key: IconKey) -> Option<PixelBuffer> {
        let slot = self.slot(key)?;
        slot.get_or_init(|| self.decode(key)).await.clone()
    }

    fn slot(&self, key: IconKey) -> Option<Slot> {
        let mut slots = self.slots.lock().ok()?;
        Some(slots.entry(key).or_default().clone())
    }

    async fn decode(&self, key: IconKey) -> Option<PixelBuffer> {
        let loader = Arc::clone(&self.loader);
        let result = tokio::task::spawn_blocking(move || loader.load(key))
            .await
            .map_err(|e| IconError::Join(e.to_string()))
            .and_then(|r| r);

        match result {
            Ok(img) => {
                debug!("Decoded icon {:?} ({}x{})", key, img.width(), img.height());
                Some(PixelBuffer::from_rgba(&img))
            }
            Err(e) => {
                warn!("Icon unavailable: {}", e);
                None
            }
        }
    }
}
