//! Merges raw per-tick OCR reads into the canonical life state.
//!
//! Any field that fails to parse keeps its previous value, so a single bad read
//! never makes a bar flicker. The icon-variant flags are taken from template
//! matching and update even when the numbers do not.

use tracing::{debug, info};

use super::parse::{FractionRead, parse_fraction, parse_percent};
use super::state::LifeState;

/// Raw OCR text for one tick, plus which icon variants matched.
#[derive(Clone, Debug, Default)]
pub struct RawReadings {
    pub hp: String,
    pub prayer: String,
    pub summoning: String,
    pub adrenaline: String,
    pub adrenaline_active: bool,
    pub prayer_active: bool,
}

/// What one reconcile step observed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Number of numeric fields (out of seven) that parsed this tick.
    pub parsed_fields: usize,
    /// Set on the tick where detection first became ready.
    pub became_ready: bool,
}

impl ReconcileOutcome {
    /// A tick is failed when no numeric field parsed.
    pub fn is_failed(&self) -> bool {
        self.parsed_fields == 0
    }
}

#[derive(Debug, Default)]
pub struct Reconciler {
    state: LifeState,
    ready: bool,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LifeState {
        &self.state
    }

    /// True once HP has parsed together with Prayer or Adrenaline.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Applies one tick of raw readings.
    pub fn apply(&mut self, raw: &RawReadings) -> ReconcileOutcome {
        let hp = parse_fraction(&raw.hp);
        let prayer = parse_fraction(&raw.prayer);
        let summoning = parse_fraction(&raw.summoning);
        let adrenaline = parse_percent(&raw.adrenaline);

        merge_fraction(&mut self.state.hp, &mut self.state.hp_max, hp);
        merge_fraction(&mut self.state.prayer, &mut self.state.prayer_max, prayer);
        merge_fraction(
            &mut self.state.summoning,
            &mut self.state.summoning_max,
            summoning,
        );
        if let Some(value) = adrenaline {
            self.state.adrenaline = value;
        }

        self.state.adrenaline_active = Some(raw.adrenaline_active);
        self.state.prayer_active = Some(raw.prayer_active);

        let parsed_fields = hp.parsed_fields()
            + prayer.parsed_fields()
            + summoning.parsed_fields()
            + adrenaline.is_some() as usize;

        debug!(
            "Reconciled {} fields: hp={:?} prayer={:?} summoning={:?} adrenaline={:?}",
            parsed_fields, hp, prayer, summoning, adrenaline
        );

        let mut became_ready = false;
        if !self.ready && hp.is_complete() && (prayer.is_complete() || adrenaline.is_some()) {
            self.ready = true;
            became_ready = true;
            info!(
                "Detection ready: hp {}/{}",
                self.state.hp, self.state.hp_max
            );
        }

        ReconcileOutcome {
            parsed_fields,
            became_ready,
        }
    }
}

fn merge_fraction(current: &mut u32, max: &mut u32, read: FractionRead) {
    if let Some(value) = read.current {
        *current = value;
    }
    if let Some(value) = read.max {
        *max = value;
    }
}
