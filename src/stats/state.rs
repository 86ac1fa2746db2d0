//! Canonical life-state model.

use serde::{Deserialize, Serialize};

/// One of the four tracked combat stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Hp,
    Prayer,
    Summoning,
    Adrenaline,
}

impl StatKind {
    /// All stats in the default draw order.
    pub const ALL: [StatKind; 4] = [
        StatKind::Hp,
        StatKind::Prayer,
        StatKind::Summoning,
        StatKind::Adrenaline,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatKind::Hp => "hp",
            StatKind::Prayer => "prayer",
            StatKind::Summoning => "summoning",
            StatKind::Adrenaline => "adrenaline",
        }
    }
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Adrenaline is a percentage with a fixed denominator.
pub const ADRENALINE_MAX: u32 = 100;

/// Current reading of every stat.
///
/// Current values may exceed their maximum (overcap). A maximum of zero means the
/// denominator has never been read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeState {
    pub hp: u32,
    pub hp_max: u32,
    pub adrenaline: u32,
    pub prayer: u32,
    pub prayer_max: u32,
    pub summoning: u32,
    pub summoning_max: u32,
    /// Whether the lit adrenaline icon matched this tick; `None` before any detection.
    pub adrenaline_active: Option<bool>,
    /// Whether the lit prayer icon matched this tick; `None` before any detection.
    pub prayer_active: Option<bool>,
}

impl Default for LifeState {
    fn default() -> Self {
        Self {
            hp: 100,
            hp_max: 100,
            adrenaline: 0,
            prayer: 100,
            prayer_max: 100,
            summoning: 0,
            summoning_max: 100,
            adrenaline_active: None,
            prayer_active: None,
        }
    }
}

impl LifeState {
    /// Returns `(current, max)` for a stat.
    pub fn reading(&self, kind: StatKind) -> (u32, u32) {
        match kind {
            StatKind::Hp => (self.hp, self.hp_max),
            StatKind::Prayer => (self.prayer, self.prayer_max),
            StatKind::Summoning => (self.summoning, self.summoning_max),
            StatKind::Adrenaline => (self.adrenaline, ADRENALINE_MAX),
        }
    }

    /// Returns the per-tick icon-variant flag for stats that have one.
    pub fn active_flag(&self, kind: StatKind) -> Option<bool> {
        match kind {
            StatKind::Adrenaline => self.adrenaline_active,
            StatKind::Prayer => self.prayer_active,
            StatKind::Hp | StatKind::Summoning => None,
        }
    }

    /// Whether the lit icon variant should be shown. Falls back to `current > 0`
    /// when no detection flag is present.
    pub fn is_active(&self, kind: StatKind) -> bool {
        let (current, _) = self.reading(kind);
        self.active_flag(kind).unwrap_or(current > 0)
    }
}
