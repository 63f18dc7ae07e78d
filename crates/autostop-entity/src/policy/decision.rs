//! Per-user reconciliation decisions.

use uuid::Uuid;

use crate::preference::PreferencePatch;

/// What to do with one user's preference record.
#[derive(Debug, Clone, PartialEq)]
pub enum PreferenceAction {
    /// Merge the patch into the record, creating it if absent.
    Upsert(PreferencePatch),
    /// Remove the record entirely.
    Delete,
    /// No rule applies to this user; the record is left exactly as it is.
    NoChange,
}

/// The resolved decision for one user.
///
/// Computed fresh on every invocation and never cached across requests.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// The user the decision applies to.
    pub user_id: Uuid,
    /// Login id, carried for audit logging.
    pub login_id: String,
    /// The action to apply against the store.
    pub action: PreferenceAction,
}
