//! Typed partial-update patch for preference rows.
//!
//! The store merge distinguishes three outcomes per field: leave the
//! stored value alone, assign a new value, or remove the value entirely.
//! The lifetime cap uses the three-state [`Patch`]; plain set-or-keep
//! fields use `Option`.

use super::model::ShutdownPreference;

/// Three-state field assignment: keep the stored value, set a new one,
/// or clear it (column goes NULL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Leave the stored value untouched.
    #[default]
    Keep,
    /// Assign a new value.
    Set(T),
    /// Remove the stored value.
    Clear,
}

impl<T: Copy> Patch<T> {
    /// Whether this patch writes the field at all.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Keep)
    }

    /// The value to write when applied: `Some` for `Set`, `None` for
    /// `Clear`. Meaningless for `Keep` (returns `None`).
    pub fn applied_value(&self) -> Option<T> {
        match self {
            Self::Set(v) => Some(*v),
            Self::Keep | Self::Clear => None,
        }
    }
}

/// Partial update for one user's [`ShutdownPreference`] row.
///
/// Fields left at their defaults are not written by the merge; existing
/// stored values survive untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreferencePatch {
    /// Master auto-shutdown switch (`None` = leave untouched).
    pub enable_workspace_auto_shutdown: Option<bool>,
    /// Lifetime cap in seconds, with an explicit clear state.
    pub maximum_workspace_lifetime_seconds: Patch<i64>,
    /// Session notification switch (`None` = leave untouched).
    pub enable_session_notifications: Option<bool>,
    /// Session notification period (`None` = leave untouched).
    pub session_notification_period: Option<i64>,
    /// One-time collaborator notification default (`None` = leave untouched).
    pub notify_about_collaborator_additions: Option<bool>,
}

impl PreferencePatch {
    /// Whether the patch writes nothing.
    pub fn is_empty(&self) -> bool {
        self.enable_workspace_auto_shutdown.is_none()
            && !self.maximum_workspace_lifetime_seconds.is_applied()
            && self.enable_session_notifications.is_none()
            && self.session_notification_period.is_none()
            && self.notify_about_collaborator_additions.is_none()
    }

    /// Apply the patch to an in-memory row, with the same semantics the
    /// SQL merge has: applied fields are assigned, kept fields survive.
    pub fn apply_to(&self, pref: &mut ShutdownPreference) {
        if let Some(enabled) = self.enable_workspace_auto_shutdown {
            pref.enable_workspace_auto_shutdown = enabled;
        }
        match self.maximum_workspace_lifetime_seconds {
            Patch::Keep => {}
            Patch::Set(seconds) => pref.maximum_workspace_lifetime_seconds = Some(seconds),
            Patch::Clear => pref.maximum_workspace_lifetime_seconds = None,
        }
        if let Some(enabled) = self.enable_session_notifications {
            pref.enable_session_notifications = Some(enabled);
        }
        if let Some(period) = self.session_notification_period {
            pref.session_notification_period = Some(period);
        }
        if let Some(notify) = self.notify_about_collaborator_additions {
            pref.notify_about_collaborator_additions = Some(notify);
        }
    }
}
