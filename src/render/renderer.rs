//! Change-gated overlay rendering.
//!
//! The renderer remembers serialized snapshots of the last state and style it
//! drew. An update that matches both is skipped, so a steady stream of
//! identical ticks costs nothing on the surface. Because primitives expire, a
//! keep-alive pass redraws the same frame without clearing it first.

use std::time::Duration;
use tracing::{debug, info};

use super::compositor::Compositor;
use super::icons::{IconCache, IconLoader};
use super::layout::plan_slots;
use super::paint::paint_bar;
use super::surface::DrawingSurface;
use crate::detection::IconKey;
use crate::error::DrawError;
use crate::stats::LifeState;
use crate::style::StyleDescriptor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Nothing was drawn: hidden, no overlay yet, or nothing changed.
    Skipped,
    Drawn { primitives: usize },
}

pub struct OverlayRenderer<S: DrawingSurface, L: IconLoader> {
    surface: S,
    icons: IconCache<L>,
    compositor: Compositor,
    group_prefix: String,
    group: Option<String>,
    ttl: Duration,
    visible: bool,
    last_state: Option<String>,
    last_style: Option<String>,
}

impl<S: DrawingSurface, L: IconLoader> OverlayRenderer<S, L> {
    pub fn new(surface: S, icons: IconCache<L>, group_prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            surface,
            icons,
            compositor: Compositor::new(),
            group_prefix: group_prefix.into(),
            group: None,
            ttl,
            visible: true,
            last_state: None,
            last_style: None,
        }
    }

    pub fn overlay_permitted(&self) -> bool {
        self.surface.overlay_permitted()
    }

    /// Group id, once the overlay has been created.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Allocates a fresh group id. Until this is called every render is skipped.
    pub fn create_overlay(&mut self) -> &str {
        let id = format!(
            "{}-{}",
            self.group_prefix,
            chrono::Utc::now().timestamp_millis()
        );
        info!("Overlay group created: {}", id);
        self.last_state = None;
        self.last_style = None;
        self.group.insert(id)
    }

    pub fn update_z_index(&mut self, style: &StyleDescriptor) -> Result<(), DrawError> {
        let Some(group) = self.group.as_deref() else {
            return Ok(());
        };
        self.surface.set_group_z_index(group, style.z_index())
    }

    /// Shows or hides the overlay. Hiding clears the group; showing forces a
    /// full redraw.
    pub async fn set_visible(
        &mut self,
        visible: bool,
        state: &LifeState,
        style: &StyleDescriptor,
    ) -> Result<RenderOutcome, DrawError> {
        self.visible = visible;
        if !visible {
            if let Some(group) = self.group.as_deref() {
                self.surface.clear_group(group)?;
            }
            self.last_state = None;
            self.last_style = None;
            return Ok(RenderOutcome::Skipped);
        }
        self.last_state = None;
        self.last_style = None;
        self.render(state, style, false).await
    }

    /// Draws the frame if state or style differ from the last drawn frame.
    pub async fn update(
        &mut self,
        state: &LifeState,
        style: &StyleDescriptor,
    ) -> Result<RenderOutcome, DrawError> {
        self.render(state, style, false).await
    }

    /// Redraws the last frame so its primitives do not expire.
    pub async fn keep_alive(
        &mut self,
        state: &LifeState,
        style: &StyleDescriptor,
    ) -> Result<RenderOutcome, DrawError> {
        self.render(state, style, true).await
    }

    async fn render(
        &mut self,
        state: &LifeState,
        style: &StyleDescriptor,
        force: bool,
    ) -> Result<RenderOutcome, DrawError> {
        if !self.visible {
            return Ok(RenderOutcome::Skipped);
        }
        let Some(group) = self.group.clone() else {
            return Ok(RenderOutcome::Skipped);
        };

        let state_key = serde_json::to_string(state).ok();
        let style_key = serde_json::to_string(style).ok();
        let changed = state_key.is_none()
            || style_key.is_none()
            || self.last_state != state_key
            || self.last_style != style_key;
        if !changed && !force {
            return Ok(RenderOutcome::Skipped);
        }

        let slots = plan_slots(state, style);
        let mut primitives = Vec::new();
        for slot in &slots {
            let icon = if style.show_icons {
                let key = IconKey::for_stat(slot.kind, state.is_active(slot.kind));
                self.icons.get(key).await
            } else {
                None
            };
            primitives.extend(paint_bar(
                slot,
                state,
                style,
                &mut self.compositor,
                icon.as_ref(),
            ));
        }

        if changed {
            self.surface.clear_group(&group)?;
        }
        self.surface.set_group(&group)?;
        for primitive in &primitives {
            self.surface.draw(primitive, self.ttl)?;
        }
        self.surface.end_frame()?;

        debug!(
            "Drew {} bars ({} primitives){}",
            slots.len(),
            primitives.len(),
            if changed { "" } else { " for keep-alive" }
        );
        self.last_state = state_key;
        self.last_style = style_key;
        Ok(RenderOutcome::Drawn {
            primitives: primitives.len(),
        })
    }
}
