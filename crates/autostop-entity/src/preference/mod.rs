//! Per-user auto-shutdown preference entity and its partial-update patch.

pub mod model;
pub mod patch;

pub use model::ShutdownPreference;
pub use patch::{Patch, PreferencePatch};
