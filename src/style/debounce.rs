//! Rate-limits interactive style edits before they reach the renderer.
//!
//! Field edits are merged and published once no further edit has arrived for
//! the debounce period. Theme selection and reset are discrete actions and are
//! published immediately.

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use super::descriptor::{StyleDescriptor, StylePatch};
use super::theme::{CUSTOM_THEME, theme_by_name};

#[derive(Clone, Debug)]
pub enum StyleEdit {
    Patch(StylePatch),
    Theme(String),
    Reset,
}

/// Handle for submitting edits to the editor task.
#[derive(Clone, Debug)]
pub struct StyleEditor {
    tx: mpsc::UnboundedSender<StyleEdit>,
}

impl StyleEditor {
    /// Spawns the editor task. The returned receiver always holds the latest
    /// published descriptor.
    pub fn spawn(
        initial: StyleDescriptor,
        debounce: Duration,
    ) -> (Self, watch::Receiver<StyleDescriptor>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (style_tx, style_rx) = watch::channel(initial);
        tokio::spawn(run_editor(rx, style_tx, debounce));
        (Self { tx }, style_rx)
    }

    pub fn patch(&self, patch: StylePatch) {
        self.send(StyleEdit::Patch(patch));
    }

    pub fn apply_theme(&self, name: impl Into<String>) {
        self.send(StyleEdit::Theme(name.into()));
    }

    pub fn reset(&self) {
        self.send(StyleEdit::Reset);
    }

    fn send(&self, edit: StyleEdit) {
        if self.tx.send(edit).is_err() {
            warn!("Style editor has stopped; edit dropped");
        }
    }
}

async fn run_editor(
    mut rx: mpsc::UnboundedReceiver<StyleEdit>,
    style_tx: watch::Sender<StyleDescriptor>,
    debounce: Duration,
) {
    let mut pending: Option<StylePatch> = None;
    let mut deadline = Instant::now();

    loop {
        tokio::select! {
            edit = rx.recv() => match edit {
                Some(StyleEdit::Patch(mut patch)) => {
                    // Hand-picked colors detach the style from its theme
                    if patch.colors.is_some() && patch.theme.is_none() {
                        patch.theme = Some(Some(CUSTOM_THEME.to_string()));
                    }
                    pending.get_or_insert_with(StylePatch::default).merge(patch);
                    deadline = Instant::now() + debounce;
                }
                Some(StyleEdit::Theme(name)) => {
                    let Some(theme) = theme_by_name(&name) else {
                        warn!("Unknown theme: {}", name);
                        continue;
                    };
                    let base = flush(&mut pending, &style_tx);
                    info!("Applying theme {}", theme.name);
                    publish(&style_tx, theme.apply(&base));
                }
                Some(StyleEdit::Reset) => {
                    pending = None;
                    info!("Resetting style to defaults");
                    publish(&style_tx, StyleDescriptor::default());
                }
                None => {
                    flush(&mut pending, &style_tx);
                    debug!("Style editor stopped");
                    break;
                }
            },
            () = sleep_until(deadline), if pending.is_some() => {
                flush(&mut pending, &style_tx);
            }
        }
    }
}

/// Applies and publishes any pending patch, returning the current descriptor.
fn flush(
    pending: &mut Option<StylePatch>,
    style_tx: &watch::Sender<StyleDescriptor>,
) -> StyleDescriptor {
    let current = style_tx.borrow().clone();
    match pending.take() {
        Some(patch) => {
            let next = current.apply(&patch);
            publish(style_tx, next.clone());
            next
        }
        None => current,
    }
}

fn publish(style_tx: &watch::Sender<StyleDescriptor>, next: StyleDescriptor) {
    style_tx.send_if_modified(|style| {
        if *style == next {
            return false;
        }
        *style = next;
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Point;
    use crate::style::Palette;
    use tokio::time::{sleep, timeout};

    const DEBOUNCE: Duration = Duration::from_millis(150);

    fn width(w: u32) -> StylePatch {
        StylePatch {
            bar_width: Some(w),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_patches_are_debounced() {
        let (editor, mut rx) = StyleEditor::spawn(StyleDescriptor::default(), DEBOUNCE);

        editor.patch(width(160));
        sleep(Duration::from_millis(50)).await;
        editor.patch(width(170));
        sleep(Duration::from_millis(100)).await;
        assert!(!rx.has_changed().unwrap(), "still inside the quiet period");

        sleep(Duration::from_millis(60)).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().bar_width, 170);
    }

    #[tokio::test(start_paused = true)]
    async fn test_theme_is_immediate() {
        let (editor, mut rx) = StyleEditor::spawn(StyleDescriptor::default(), DEBOUNCE);

        editor.apply_theme("minimal");
        timeout(Duration::from_millis(1), rx.changed())
            .await
            .expect("theme should publish without waiting")
            .unwrap();
        assert_eq!(rx.borrow().theme.as_deref(), Some("minimal"));
        assert_eq!(rx.borrow().bar_height, 16);
    }

    #[tokio::test(start_paused = true)]
    async fn test_theme_keeps_pending_edits() {
        let (editor, mut rx) = StyleEditor::spawn(StyleDescriptor::default(), DEBOUNCE);

        editor.patch(StylePatch {
            position: Some(Point::new(10, 20)),
            ..Default::default()
        });
        editor.apply_theme("neo");
        timeout(Duration::from_millis(1), rx.changed())
            .await
            .unwrap()
            .unwrap();

        let style = rx.borrow_and_update().clone();
        assert_eq!(style.position, Point::new(10, 20));
        assert_eq!(style.theme.as_deref(), Some("neo"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_discards_pending() {
        let initial = StyleDescriptor {
            font_size: 20,
            ..Default::default()
        };
        let (editor, mut rx) = StyleEditor::spawn(initial, DEBOUNCE);

        editor.patch(width(300));
        editor.reset();
        timeout(Duration::from_millis(1), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(*rx.borrow_and_update(), StyleDescriptor::default());

        sleep(DEBOUNCE * 2).await;
        assert!(!rx.has_changed().unwrap(), "the dropped patch never lands");
    }

    #[tokio::test(start_paused = true)]
    async fn test_color_edit_marks_custom() {
        let (editor, mut rx) = StyleEditor::spawn(StyleDescriptor::default(), DEBOUNCE);

        editor.patch(StylePatch {
            colors: Some(Palette::default()),
            ..Default::default()
        });
        sleep(DEBOUNCE + Duration::from_millis(10)).await;
        assert_eq!(rx.borrow_and_update().theme.as_deref(), Some(CUSTOM_THEME));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_theme_is_ignored() {
        let (editor, rx) = StyleEditor::spawn(StyleDescriptor::default(), DEBOUNCE);
        editor.apply_theme("sparkly");
        sleep(Duration::from_millis(5)).await;
        assert!(!rx.has_changed().unwrap());
    }
}
