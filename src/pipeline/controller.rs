//! Snapshot diffing between perception, style and the renderer.
//!
//! Each step compares the previous snapshot with the new one and issues only the
//! overlay effects the difference calls for.

use tracing::{info, warn};

use crate::render::{DrawingSurface, IconLoader, OverlayRenderer};
use crate::stats::LifeState;
use crate::style::StyleDescriptor;

#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub ready: bool,
    pub overlay_permitted: bool,
    pub visible: bool,
    pub state: LifeState,
    pub style: StyleDescriptor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    CreateOverlay,
    SetVisibility(bool),
    UpdateZIndex,
    Render,
}

/// Effects needed to move from `prev` to `next`.
///
/// Nothing happens until detection is ready and the host permits overlays; the
/// step that first meets both creates the overlay and draws it.
pub fn diff(prev: Option<&Snapshot>, next: &Snapshot, overlay_exists: bool) -> Vec<Effect> {
    if !overlay_exists {
        if next.ready && next.overlay_permitted {
            return vec![
                Effect::CreateOverlay,
                Effect::UpdateZIndex,
                Effect::SetVisibility(next.visible),
            ];
        }
        return Vec::new();
    }

    let Some(prev) = prev else {
        return vec![
            Effect::UpdateZIndex,
            Effect::SetVisibility(next.visible),
        ];
    };

    let style_changed = prev.style != next.style;
    let mut effects = Vec::new();
    if style_changed {
        effects.push(Effect::UpdateZIndex);
    }
    if prev.visible != next.visible {
        effects.push(Effect::SetVisibility(next.visible));
    }
    if style_changed || prev.state != next.state {
        effects.push(Effect::Render);
    }
    effects
}

/// Applies diffed effects to a renderer.
pub struct OverlayController<S: DrawingSurface, L: IconLoader> {
    renderer: OverlayRenderer<S, L>,
    prev: Option<Snapshot>,
    overlay_exists: bool,
}

impl<S: DrawingSurface, L: IconLoader> OverlayController<S, L> {
    pub fn new(renderer: OverlayRenderer<S, L>) -> Self {
        Self {
            renderer,
            prev: None,
            overlay_exists: false,
        }
    }

    pub fn overlay_exists(&self) -> bool {
        self.overlay_exists
    }

    pub fn overlay_permitted(&self) -> bool {
        self.renderer.overlay_permitted()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.prev.as_ref()
    }

    /// Diffs `next` against the previous snapshot and applies the effects.
    ///
    /// Failures are logged and leave the previous snapshot in place, so the
    /// next step diffs against it again and repeats the failed effects.
    pub async fn step(&mut self, next: Snapshot) -> Vec<Effect> {
        let effects = diff(self.prev.as_ref(), &next, self.overlay_exists);
        let mut failed = false;

        for effect in &effects {
            let result = match effect {
                Effect::CreateOverlay => {
                    self.renderer.create_overlay();
                    self.overlay_exists = true;
                    Ok(())
                }
                Effect::UpdateZIndex => self.renderer.update_z_index(&next.style),
                Effect::SetVisibility(visible) => {
                    info!("Overlay {}", if *visible { "shown" } else { "hidden" });
                    self.renderer
                        .set_visible(*visible, &next.state, &next.style)
                        .await
                        .map(|_| ())
                }
                Effect::Render => self
                    .renderer
                    .update(&next.state, &next.style)
                    .await
                    .map(|_| ()),
            };
            if let Err(e) = result {
                warn!("Overlay {:?} failed: {}", effect, e);
                failed = true;
            }
        }

        if self.overlay_exists && !failed {
            self.prev = Some(next);
        }
        effects
    }

    /// Refreshes the drawn frame before its primitives expire.
    pub async fn keep_alive(&mut self) {
        let Some(prev) = self.prev.as_ref() else {
            return;
        };
        if !prev.visible {
            return;
        }
        if let Err(e) = self.renderer.keep_alive(&prev.state, &prev.style).await {
            warn!("Keep-alive redraw failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::IconKey;
    use crate::error::IconError;
    use crate::render::{DrawCommand, IconCache, RecordingSurface};
    use std::time::Duration;

    fn snapshot() -> Snapshot {
        Snapshot {
            ready: true,
            overlay_permitted: true,
            visible: true,
            state: LifeState::default(),
            style: StyleDescriptor::default(),
        }
    }

    #[test]
    fn test_nothing_until_ready_and_permitted() {
        let not_ready = Snapshot {
            ready: false,
            ..snapshot()
        };
        assert!(diff(None, &not_ready, false).is_empty());

        let denied = Snapshot {
            overlay_permitted: false,
            ..snapshot()
        };
        assert!(diff(None, &denied, false).is_empty());

        assert_eq!(
            diff(Some(&not_ready), &snapshot(), false),
            vec![
                Effect::CreateOverlay,
                Effect::UpdateZIndex,
                Effect::SetVisibility(true)
            ]
        );
    }

    #[test]
    fn test_diff_issues_only_needed_effects() {
        let prev = snapshot();
        assert!(diff(Some(&prev), &prev.clone(), true).is_empty());

        let moved = Snapshot {
            state: LifeState {
                hp: 50,
                ..Default::default()
            },
            ..prev.clone()
        };
        assert_eq!(diff(Some(&prev), &moved, true), vec![Effect::Render]);

        let hidden = Snapshot {
            visible: false,
            ..prev.clone()
        };
        assert_eq!(
            diff(Some(&prev), &hidden, true),
            vec![Effect::SetVisibility(false)]
        );

        let restyled = Snapshot {
            style: StyleDescriptor {
                always_on_top: false,
                ..Default::default()
            },
            ..prev.clone()
        };
        assert_eq!(
            diff(Some(&prev), &restyled, true),
            vec![Effect::UpdateZIndex, Effect::Render]
        );
    }

    struct NoIcons;

    impl IconLoader for NoIcons {
        fn load(&self, key: IconKey) -> Result<image::RgbaImage, IconError> {
            Err(IconError::Decode {
                source_name: format!("{:?}", key),
                message: "none".to_string(),
            })
        }
    }

    fn controller() -> (OverlayController<RecordingSurface, NoIcons>, RecordingSurface) {
        let surface = RecordingSurface::new();
        let renderer = OverlayRenderer::new(
            surface.clone(),
            IconCache::new(NoIcons),
            "bars",
            Duration::from_secs(30),
        );
        (OverlayController::new(renderer), surface)
    }

    #[tokio::test]
    async fn test_steps_create_then_render_changes_only() {
        let (mut controller, surface) = controller();

        let waiting = Snapshot {
            ready: false,
            ..snapshot()
        };
        assert!(controller.step(waiting).await.is_empty());
        assert!(surface.commands().is_empty());

        controller.step(snapshot()).await;
        assert!(controller.overlay_exists());
        let commands = surface.take();
        assert!(matches!(commands[0], DrawCommand::SetZIndex(_, 1000)));
        assert!(commands.iter().any(|c| c.is_draw()));

        assert!(controller.step(snapshot()).await.is_empty());
        assert!(surface.commands().is_empty());

        controller.keep_alive().await;
        assert!(surface.draw_count() > 0);
        assert!(
            !surface
                .commands()
                .iter()
                .any(|c| matches!(c, DrawCommand::ClearGroup(_)))
        );
    }

    #[tokio::test]
    async fn test_failed_draw_is_retried_on_next_step() {
        let (mut controller, surface) = controller();
        let full = Snapshot {
            state: LifeState {
                hp: 100,
                hp_max: 100,
                ..Default::default()
            },
            ..snapshot()
        };
        controller.step(full.clone()).await;
        surface.take();

        let hurt = Snapshot {
            state: LifeState {
                hp: 50,
                ..full.state.clone()
            },
            ..full
        };
        surface.set_failing(true);
        assert_eq!(controller.step(hurt.clone()).await, vec![Effect::Render]);
        assert_eq!(surface.draw_count(), 0);
        assert_eq!(controller.last().map(|s| s.state.hp), Some(100));

        surface.set_failing(false);
        assert_eq!(controller.step(hurt).await, vec![Effect::Render]);
        assert!(surface.draw_count() > 0);
        assert_eq!(controller.last().map(|s| s.state.hp), Some(50));

        surface.take();
        let settled = controller.last().cloned().unwrap();
        assert!(controller.step(settled).await.is_empty());
        assert_eq!(surface.draw_count(), 0);
    }

    #[tokio::test]
    async fn test_no_overlay_while_host_denies_permission() {
        let (mut controller, surface) = controller();
        surface.set_overlay_permitted(false);
        let denied = Snapshot {
            overlay_permitted: controller.overlay_permitted(),
            ..snapshot()
        };
        assert!(!denied.overlay_permitted);
        assert!(controller.step(denied).await.is_empty());
        assert!(!controller.overlay_exists());
        assert!(surface.commands().is_empty());

        surface.set_overlay_permitted(true);
        let granted = Snapshot {
            overlay_permitted: controller.overlay_permitted(),
            ..snapshot()
        };
        assert_eq!(
            controller.step(granted).await,
            vec![
                Effect::CreateOverlay,
                Effect::UpdateZIndex,
                Effect::SetVisibility(true)
            ]
        );
        assert!(controller.overlay_exists());
    }

    #[tokio::test]
    async fn test_keep_alive_skipped_while_hidden() {
        let (mut controller, surface) = controller();
        controller.step(snapshot()).await;
        controller
            .step(Snapshot {
                visible: false,
                ..snapshot()
            })
            .await;
        surface.take();

        controller.keep_alive().await;
        assert!(surface.commands().is_empty());
    }
}
