//! The host drawing surface contract and in-process implementations.
//!
//! The surface is append-only: every primitive carries a time-to-live and stays
//! until it expires or its group is cleared.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use crate::capture::Rect;
use crate::error::DrawError;

/// A packed BGRA bitmap as the drawing surface expects it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub bgra: Arc<[u8]>,
}

impl PixelBuffer {
    /// Packs an RGBA image into BGRA.
    pub fn from_rgba(img: &image::RgbaImage) -> Self {
        let bgra: Vec<u8> = img
            .pixels()
            .flat_map(|p| [p[2], p[1], p[0], p[3]])
            .collect();
        Self {
            width: img.width(),
            height: img.height(),
            bgra: bgra.into(),
        }
    }

    /// Returns the pixel at (x, y) as RGBA.
    pub fn rgba_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let p = self.bgra.get(i..i + 4)?;
        Some([p[2], p[1], p[0], p[3]])
    }
}

/// A text primitive. `x` is the horizontal center when `centered` is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextPrimitive {
    pub text: String,
    /// Packed 0xAARRGGBB
    pub color: u32,
    pub font_size: u32,
    pub x: i32,
    pub y: i32,
    pub font: &'static str,
    pub centered: bool,
    pub shadow: bool,
}

/// One drawable element of a render pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Primitive {
    Image { x: i32, y: i32, image: PixelBuffer },
    Rect { color: u32, rect: Rect, thickness: u32 },
    Text(TextPrimitive),
}

pub trait DrawingSurface: Send {
    fn set_group(&mut self, id: &str) -> Result<(), DrawError>;
    fn set_group_z_index(&mut self, id: &str, z: i32) -> Result<(), DrawError>;
    fn clear_group(&mut self, id: &str) -> Result<(), DrawError>;
    fn draw_image(
        &mut self,
        x: i32,
        y: i32,
        image: &PixelBuffer,
        ttl: Duration,
    ) -> Result<(), DrawError>;
    fn draw_rect(
        &mut self,
        color: u32,
        rect: Rect,
        ttl: Duration,
        thickness: u32,
    ) -> Result<(), DrawError>;
    fn draw_text(&mut self, text: &TextPrimitive, ttl: Duration) -> Result<(), DrawError>;

    /// Whether the host lets this process draw overlays at all.
    fn overlay_permitted(&self) -> bool {
        true
    }

    /// Called after the last primitive of a pass.
    fn end_frame(&mut self) -> Result<(), DrawError> {
        Ok(())
    }

    fn draw(&mut self, primitive: &Primitive, ttl: Duration) -> Result<(), DrawError> {
        match primitive {
            Primitive::Image { x, y, image } => self.draw_image(*x, *y, image, ttl),
            Primitive::Rect {
                color,
                rect,
                thickness,
            } => self.draw_rect(*color, *rect, ttl, *thickness),
            Primitive::Text(text) => self.draw_text(text, ttl),
        }
    }
}

/// Every call a surface received, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCommand {
    SetGroup(String),
    SetZIndex(String, i32),
    ClearGroup(String),
    Draw(Primitive),
}

impl DrawCommand {
    pub fn is_draw(&self) -> bool {
        matches!(self, DrawCommand::Draw(_))
    }
}

/// Records calls instead of drawing. Clones share one log.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    log: Arc<Mutex<Vec<DrawCommand>>>,
    failing: Arc<AtomicBool>,
    denied: Arc<AtomicBool>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<DrawCommand> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn draw_count(&self) -> usize {
        self.commands().iter().filter(|c| c.is_draw()).count()
    }

    pub fn take(&self) -> Vec<DrawCommand> {
        self.log
            .lock()
            .map(|mut log| std::mem::take(&mut *log))
            .unwrap_or_default()
    }

    /// Makes every draw call fail until switched off.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_overlay_permitted(&self, permitted: bool) {
        self.denied.store(!permitted, Ordering::SeqCst);
    }

    fn push(&self, command: DrawCommand) -> Result<(), DrawError> {
        if command.is_draw() && self.failing.load(Ordering::SeqCst) {
            return Err(DrawError::Rejected("recording surface set to fail".to_string()));
        }
        self.log
            .lock()
            .map_err(|_| DrawError::Unavailable)?
            .push(command);
        Ok(())
    }
}

impl DrawingSurface for RecordingSurface {
    fn set_group(&mut self, id: &str) -> Result<(), DrawError> {
        self.push(DrawCommand::SetGroup(id.to_string()))
    }

    fn set_group_z_index(&mut self, id: &str, z: i32) -> Result<(), DrawError> {
        self.push(DrawCommand::SetZIndex(id.to_string(), z))
    }

    fn clear_group(&mut self, id: &str) -> Result<(), DrawError> {
        self.push(DrawCommand::ClearGroup(id.to_string()))
    }

    fn draw_image(
        &mut self,
        x: i32,
        y: i32,
        image: &PixelBuffer,
        _ttl: Duration,
    ) -> Result<(), DrawError> {
        self.push(DrawCommand::Draw(Primitive::Image {
            x,
            y,
            image: image.clone(),
        }))
    }

    fn draw_rect(
        &mut self,
        color: u32,
        rect: Rect,
        _ttl: Duration,
        thickness: u32,
    ) -> Result<(), DrawError> {
        self.push(DrawCommand::Draw(Primitive::Rect {
            color,
            rect,
            thickness,
        }))
    }

    fn draw_text(&mut self, text: &TextPrimitive, _ttl: Duration) -> Result<(), DrawError> {
        self.push(DrawCommand::Draw(Primitive::Text(text.clone())))
    }

    fn overlay_permitted(&self) -> bool {
        !self.denied.load(Ordering::SeqCst)
    }
}

/// Logs primitives at debug level. Used when no real host surface is attached.
#[derive(Debug, Default)]
pub struct TraceSurface {
    drawn: usize,
}

impl DrawingSurface for TraceSurface {
    fn set_group(&mut self, id: &str) -> Result<(), DrawError> {
        debug!("set_group {}", id);
        Ok(())
    }

    fn set_group_z_index(&mut self, id: &str, z: i32) -> Result<(), DrawError> {
        debug!("set_group_z_index {} {}", id, z);
        Ok(())
    }

    fn clear_group(&mut self, id: &str) -> Result<(), DrawError> {
        debug!("clear_group {}", id);
        Ok(())
    }

    fn draw_image(
        &mut self,
        x: i32,
        y: i32,
        image: &PixelBuffer,
        ttl: Duration,
    ) -> Result<(), DrawError> {
        self.drawn += 1;
        debug!(
            "image {}x{} at ({}, {}) ttl {:?}",
            image.width, image.height, x, y, ttl
        );
        Ok(())
    }

    fn draw_rect(
        &mut self,
        color: u32,
        rect: Rect,
        ttl: Duration,
        thickness: u32,
    ) -> Result<(), DrawError> {
        self.drawn += 1;
        debug!(
            "rect #{:08x} {:?} thickness {} ttl {:?}",
            color, rect, thickness, ttl
        );
        Ok(())
    }

    fn draw_text(&mut self, text: &TextPrimitive, ttl: Duration) -> Result<(), DrawError> {
        self.drawn += 1;
        debug!(
            "text {:?} #{:08x} {}px at ({}, {}) ttl {:?}",
            text.text, text.color, text.font_size, text.x, text.y, ttl
        );
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), DrawError> {
        debug!("frame done, {} primitives so far", self.drawn);
        Ok(())
    }
}
