//! Admin-supplied per-user overrides.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-user exceptions to the global policy, supplied with the request.
///
/// Values are taken verbatim: an explicit override is never clamped to the
/// global maximum, and a negative value is the delete sentinel for the
/// user's preference record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleOverrides {
    /// Requested lifetime in seconds, keyed by login id.
    pub users: HashMap<String, i64>,
    /// Apply the global default lifetime to every user not named in `users`.
    pub override_to_default: bool,
}

impl RuleOverrides {
    /// The explicit lifetime requested for a login id, if any.
    pub fn lifetime_for(&self, login_id: &str) -> Option<i64> {
        self.users.get(login_id).copied()
    }
}
