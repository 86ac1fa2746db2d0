//! The async main loop.
//!
//! One task drives everything: detection ticks (each run to completion on a
//! blocking thread before the next is scheduled), keep-alive redraws, published
//! style changes and console commands.

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};
use tracing::{info, warn};

use super::console::{Command, parse_command};
use super::controller::{OverlayController, Snapshot};
use super::perception::Perception;
use super::status::HostStatus;
use crate::capture::CaptureProvider;
use crate::ocr::GlyphReader;
use crate::render::{DrawingSurface, IconLoader};
use crate::style::{StyleDescriptor, StyleEditor, StyleStore};

pub struct Pipeline<C, R, S: DrawingSurface, L: IconLoader> {
    pub perception: Perception<C, R>,
    pub controller: OverlayController<S, L>,
    pub editor: StyleEditor,
    pub styles: watch::Receiver<StyleDescriptor>,
    pub store: StyleStore,
    pub keep_alive: Duration,
}

impl<C, R, S, L> Pipeline<C, R, S, L>
where
    C: CaptureProvider + Send + 'static,
    R: GlyphReader + Send + 'static,
    S: DrawingSurface,
    L: IconLoader,
{
    /// Runs until `quit`, Ctrl+C, or the command channel closing with no
    /// further work possible.
    pub async fn run(self, mut commands: mpsc::Receiver<String>) -> Result<()> {
        let Pipeline {
            mut perception,
            mut controller,
            editor,
            mut styles,
            store,
            keep_alive,
        } = self;

        let mut visible = true;
        let mut ready = perception.is_ready();
        let mut status = HostStatus::default();
        let mut commands_open = true;

        let tick = sleep_until(Instant::now());
        tokio::pin!(tick);
        let mut keep_alive_timer = interval_at(Instant::now() + keep_alive, keep_alive);
        keep_alive_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        info!("Pipeline started");
        loop {
            tokio::select! {
                () = &mut tick => {
                    let (returned, report) = tokio::task::spawn_blocking(move || {
                        let report = perception.tick();
                        (perception, report)
                    })
                    .await
                    .context("Detection task failed")?;
                    perception = returned;
                    tick.as_mut().reset(Instant::now() + report.next_poll);
                    ready = report.ready;

                    let snapshot = take_snapshot(&perception, &controller, &styles, ready, visible);
                    controller.step(snapshot).await;

                    let next = HostStatus {
                        capture_permitted: report.capture_permitted,
                        overlay_permitted: controller.overlay_permitted(),
                        overlay_active: controller.overlay_exists() && visible,
                        detection_ready: report.ready,
                        lock_state: report.lock_state,
                    };
                    if next != status {
                        info!("Status: {}", next.status_text());
                        status = next;
                    }
                }
                _ = keep_alive_timer.tick() => {
                    controller.keep_alive().await;
                }
                Ok(()) = styles.changed() => {
                    let style = styles.borrow_and_update().clone();
                    if let Err(e) = store.save(&style) {
                        warn!("Failed to save style: {}", e);
                    }
                    let snapshot = take_snapshot(&perception, &controller, &styles, ready, visible);
                    controller.step(snapshot).await;
                }
                line = commands.recv(), if commands_open => {
                    let Some(line) = line else {
                        commands_open = false;
                        continue;
                    };
                    match parse_command(&line) {
                        Ok(Command::Quit) => break,
                        Ok(Command::Toggle) => {
                            visible = !visible;
                            status.overlay_active = controller.overlay_exists() && visible;
                            let snapshot = take_snapshot(&perception, &controller, &styles, ready, visible);
                            controller.step(snapshot).await;
                        }
                        Ok(Command::Theme(name)) => editor.apply_theme(name),
                        Ok(Command::Reset) => editor.reset(),
                        Ok(Command::Set(patch)) => editor.patch(patch),
                        Ok(Command::Status) => info!("Status: {}", status.status_text()),
                        Err(e) => warn!("{:#}", e),
                    }
                }
                _ = &mut shutdown => {
                    info!("Interrupted");
                    break;
                }
            }
        }

        info!("Pipeline stopped");
        Ok(())
    }
}

fn take_snapshot<C, R, S, L>(
    perception: &Perception<C, R>,
    controller: &OverlayController<S, L>,
    styles: &watch::Receiver<StyleDescriptor>,
    ready: bool,
    visible: bool,
) -> Snapshot
where
    C: CaptureProvider,
    R: GlyphReader,
    S: DrawingSurface,
    L: IconLoader,
{
    Snapshot {
        ready,
        overlay_permitted: controller.overlay_permitted(),
        visible,
        state: perception.state().clone(),
        style: styles.borrow().clone(),
    }
}
