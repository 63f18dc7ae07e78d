//! # autostop-service
//!
//! The rule-resolution-and-reconciliation engine: loads the global policy
//! snapshot, resolves a per-user decision from overrides and current
//! state, and converges the preference store onto the computed state.

pub mod policy;

pub use policy::loader::{PolicyLoader, SettingsSource};
pub use policy::reconciler::{ApplyOutcome, PreferenceStore, Reconciler};
pub use policy::resolver::resolve;
pub use policy::service::{ApplySummary, RulesOutcome, RulesService, UserDirectory};
