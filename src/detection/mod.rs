//! Icon detection and capture-region locking.

pub mod locator;
pub mod region_lock;
pub mod templates;

pub use locator::{PairMatch, Variant, find_pair, find_subimage};
pub use region_lock::{AnchorSet, LockState, RegionLock, RegionMargins, TickVerdict};
pub use templates::{IconKey, IconTemplates};
