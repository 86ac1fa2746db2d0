//! Wiring between perception, style edits and the overlay.

pub mod console;
pub mod controller;
pub mod perception;
pub mod runner;
pub mod status;

pub use console::{Command, parse_command, spawn_stdin_reader};
pub use controller::{Effect, OverlayController, Snapshot, diff};
pub use perception::{Perception, PerceptionSettings, TickReport};
pub use runner::Pipeline;
pub use status::HostStatus;
