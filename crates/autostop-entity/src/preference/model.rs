//! Auto-shutdown preference entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-user workspace auto-shutdown preferences.
///
/// One row per user, keyed by `user_id`. A user with no row has no
/// explicit preferences at all; a row whose
/// `maximum_workspace_lifetime_seconds` is `None` has auto-shutdown
/// enabled but no explicit lifetime cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ShutdownPreference {
    /// The user these preferences belong to.
    pub user_id: Uuid,
    /// Whether workspaces owned by this user are auto-shut-down at all.
    pub enable_workspace_auto_shutdown: bool,
    /// Maximum workspace lifetime in seconds. `None` means no explicit cap.
    pub maximum_workspace_lifetime_seconds: Option<i64>,
    /// Whether long-running-session notifications are delivered.
    pub enable_session_notifications: Option<bool>,
    /// Notification period in seconds.
    pub session_notification_period: Option<i64>,
    /// Whether the user is notified when added as a collaborator.
    /// Defaulted to `true` exactly once, when the row is first created.
    pub notify_about_collaborator_additions: Option<bool>,
    /// When the row was last written.
    pub updated_at: Option<DateTime<Utc>>,
}

impl ShutdownPreference {
    /// An empty preference row for a user, the starting point a
    /// [`PreferencePatch`](super::PreferencePatch) is applied onto when no
    /// prior row exists.
    pub fn new_for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            enable_workspace_auto_shutdown: false,
            maximum_workspace_lifetime_seconds: None,
            enable_session_notifications: None,
            session_notification_period: None,
            notify_about_collaborator_additions: None,
            updated_at: None,
        }
    }
}
