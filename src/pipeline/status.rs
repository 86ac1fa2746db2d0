//! Host status indicators.

use serde::Serialize;

use crate::detection::LockState;

/// What the host and the detection loop currently allow and report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HostStatus {
    pub capture_permitted: bool,
    pub overlay_permitted: bool,
    pub overlay_active: bool,
    pub detection_ready: bool,
    pub lock_state: LockState,
}

impl Default for HostStatus {
    fn default() -> Self {
        Self {
            capture_permitted: true,
            overlay_permitted: true,
            overlay_active: false,
            detection_ready: false,
            lock_state: LockState::Unlocked,
        }
    }
}

impl HostStatus {
    /// One-line summary for the console.
    pub fn status_text(&self) -> String {
        let flag = |on: bool| if on { "yes" } else { "no" };
        format!(
            "capture: {} | overlay permitted: {} | overlay active: {} | detection: {} | region: {}",
            flag(self.capture_permitted),
            flag(self.overlay_permitted),
            flag(self.overlay_active),
            if self.detection_ready { "ready" } else { "searching" },
            self.lock_state
        )
    }
}
