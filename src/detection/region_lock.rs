//! Narrows capture to the stat panel once enough icons are anchored.
//!
//! The lock controller owns the anchors and the capture region. Both are set
//! once per detection cycle and wiped together when reads keep failing, which
//! sends the next tick back to full-window scanning.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::capture::{Point, Rect};
use crate::stats::StatKind;

/// Pixels added around the anchor bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionMargins {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Default for RegionMargins {
    fn default() -> Self {
        Self {
            left: 15,
            top: 20,
            right: 170,
            bottom: 50,
        }
    }
}

/// Locked icon positions in window coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnchorSet {
    pub hp: Option<Point>,
    pub prayer: Option<Point>,
    pub summoning: Option<Point>,
    pub adrenaline: Option<Point>,
}

impl AnchorSet {
    pub fn get(&self, kind: StatKind) -> Option<Point> {
        match kind {
            StatKind::Hp => self.hp,
            StatKind::Prayer => self.prayer,
            StatKind::Summoning => self.summoning,
            StatKind::Adrenaline => self.adrenaline,
        }
    }

    fn slot(&mut self, kind: StatKind) -> &mut Option<Point> {
        match kind {
            StatKind::Hp => &mut self.hp,
            StatKind::Prayer => &mut self.prayer,
            StatKind::Summoning => &mut self.summoning,
            StatKind::Adrenaline => &mut self.adrenaline,
        }
    }

    pub fn is_empty(&self) -> bool {
        StatKind::ALL.iter().all(|k| self.get(*k).is_none())
    }

    /// HP plus at least one of Prayer or Adrenaline.
    pub fn is_lockable(&self) -> bool {
        self.hp.is_some() && (self.prayer.is_some() || self.adrenaline.is_some())
    }

    fn known(&self) -> impl Iterator<Item = Point> + '_ {
        StatKind::ALL.iter().filter_map(|k| self.get(*k))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LockState {
    /// No anchors; full-window capture at the coarse cadence.
    Unlocked,
    /// Some anchors, not yet enough for a region.
    Locking,
    /// Region computed; capture is narrowed to it.
    Locked,
    /// Locked, but the most recent ticks read nothing.
    Degraded,
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LockState::Unlocked => "unlocked",
            LockState::Locking => "locking",
            LockState::Locked => "locked",
            LockState::Degraded => "degraded",
        };
        f.write_str(name)
    }
}

/// Outcome of recording one tick's read result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickVerdict {
    Healthy,
    Failed { consecutive: u32 },
    /// The failure threshold was reached; anchors and region were cleared.
    Reset,
}

#[derive(Clone, Debug)]
pub struct RegionLock {
    anchors: AnchorSet,
    region: Option<Rect>,
    margins: RegionMargins,
    failure_threshold: u32,
    consecutive_failures: u32,
}

impl RegionLock {
    pub fn new(margins: RegionMargins, failure_threshold: u32) -> Self {
        Self {
            anchors: AnchorSet::default(),
            region: None,
            margins,
            failure_threshold: failure_threshold.max(1),
            consecutive_failures: 0,
        }
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    pub fn region(&self) -> Option<Rect> {
        self.region
    }

    pub fn state(&self) -> LockState {
        match self.region {
            Some(_) if self.consecutive_failures > 0 => LockState::Degraded,
            Some(_) => LockState::Locked,
            None if self.anchors.is_empty() => LockState::Unlocked,
            None => LockState::Locking,
        }
    }

    /// Rectangle to capture this tick; `None` means the full window.
    pub fn capture_target(&self) -> Option<Rect> {
        self.region
    }

    /// Window position of raster pixel (0, 0) for this tick's capture.
    pub fn capture_origin(&self) -> Point {
        self.region.map(|r| r.origin()).unwrap_or_default()
    }

    /// Poll interval for the current lock state.
    pub fn cadence(&self, unlocked: Duration, locked: Duration) -> Duration {
        if self.region.is_some() { locked } else { unlocked }
    }

    /// Records an anchor unless one is already known for that stat.
    pub fn observe(&mut self, kind: StatKind, at: Point) -> bool {
        let slot = self.anchors.slot(kind);
        if slot.is_some() {
            return false;
        }
        debug!("Anchored {} icon at ({}, {})", kind, at.x, at.y);
        *slot = Some(at);
        true
    }

    /// Computes the region once the anchor set is lockable. Returns true on the
    /// tick the lock is acquired.
    pub fn try_lock(&mut self) -> bool {
        if self.region.is_some() || !self.anchors.is_lockable() {
            return false;
        }
        let Some(region) = bounding_region(&self.anchors, &self.margins) else {
            return false;
        };
        info!(
            "Region locked at ({}, {}) {}x{}",
            region.x, region.y, region.width, region.height
        );
        self.region = Some(region);
        true
    }

    /// Counts a tick as healthy or failed, resetting after too many failures in a row.
    pub fn record_tick(&mut self, failed: bool) -> TickVerdict {
        if !failed {
            self.consecutive_failures = 0;
            return TickVerdict::Healthy;
        }

        self.consecutive_failures += 1;
        if self.consecutive_failures < self.failure_threshold {
            debug!(
                "Unreadable tick ({}/{})",
                self.consecutive_failures, self.failure_threshold
            );
            return TickVerdict::Failed {
                consecutive: self.consecutive_failures,
            };
        }

        if !self.anchors.is_empty() {
            warn!(
                "{} consecutive unreadable ticks, dropping anchors and region",
                self.consecutive_failures
            );
        }
        self.reset();
        TickVerdict::Reset
    }

    pub fn reset(&mut self) {
        self.anchors = AnchorSet::default();
        self.region = None;
        self.consecutive_failures = 0;
    }
}

/// Bounding box of the known anchors grown by the margins, origin clamped to >= 0.
fn bounding_region(anchors: &AnchorSet, margins: &RegionMargins) -> Option<Rect> {
    let mut points = anchors.known();
    let first = points.next()?;
    let (min_x, min_y, max_x, max_y) = points.fold(
        (first.x, first.y, first.x, first.y),
        |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
    );

    let x = (min_x - margins.left as i32).max(0);
    let y = (min_y - margins.top as i32).max(0);
    let right = max_x + margins.right as i32;
    let bottom = max_y + margins.bottom as i32;

    Some(Rect::new(
        x,
        y,
        (right - x).max(0) as u32,
        (bottom - y).max(0) as u32,
    ))
}
