//! Global auto-shutdown policy snapshot, override request, and per-user
//! decisions.

pub mod decision;
pub mod model;
pub mod overrides;

pub use decision::{Decision, PreferenceAction};
pub use model::{PolicySkip, ShutdownPolicy};
pub use overrides::RuleOverrides;
