//! Stat model and reconciliation of noisy OCR reads.

pub mod parse;
pub mod reconciler;
pub mod state;

pub use parse::{FractionRead, parse_fraction, parse_number, parse_percent};
pub use reconciler::{RawReadings, ReconcileOutcome, Reconciler};
pub use state::{ADRENALINE_MAX, LifeState, StatKind};
