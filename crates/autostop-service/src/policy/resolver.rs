//! Per-user rule resolution.
//!
//! Pure logic: given the immutable policy snapshot, the request overrides,
//! and one user's current preference record, compute what should happen to
//! that record. All store access happens later, in the reconciler.

use autostop_entity::policy::{Decision, PreferenceAction, RuleOverrides, ShutdownPolicy};
use autostop_entity::preference::{Patch, PreferencePatch, ShutdownPreference};
use autostop_entity::user::User;

/// Resolve the decision for one user.
///
/// Precedence, first match wins:
/// 1. An explicit override for the user's login id is taken verbatim —
///    never clamped to the global maximum, and a negative value deletes
///    the record outright.
/// 2. `override_to_default` applies the global default lifetime.
/// 3. Otherwise no rule applies and the user's record is left untouched.
///
/// Callers must have validated the policy snapshot first
/// ([`ShutdownPolicy::check`]); resolution assumes the global guards
/// already passed.
pub fn resolve(
    policy: &ShutdownPolicy,
    overrides: &RuleOverrides,
    user: &User,
    prior: Option<&ShutdownPreference>,
) -> Decision {
    let lifetime = match overrides.lifetime_for(&user.login_id) {
        Some(seconds) => seconds,
        None if overrides.override_to_default => policy.global_default_lifetime_seconds,
        None => {
            return Decision {
                user_id: user.id,
                login_id: user.login_id.clone(),
                action: PreferenceAction::NoChange,
            };
        }
    };

    if lifetime < 0 {
        return Decision {
            user_id: user.id,
            login_id: user.login_id.clone(),
            action: PreferenceAction::Delete,
        };
    }

    let mut patch = PreferencePatch {
        enable_workspace_auto_shutdown: Some(policy.auto_shutdown_enabled),
        // Zero means "no explicit cap": the column is cleared, which is
        // distinct from storing a zero-second lifetime.
        maximum_workspace_lifetime_seconds: if lifetime > 0 {
            Patch::Set(lifetime)
        } else {
            Patch::Clear
        },
        ..Default::default()
    };

    if policy.notifications_enabled {
        patch.enable_session_notifications = Some(true);
        patch.session_notification_period = Some(policy.notification_period_seconds);
    }

    // One-time default for brand-new records only.
    if prior.is_none() {
        patch.notify_about_collaborator_additions = Some(true);
    }

    Decision {
        user_id: user.id,
        login_id: user.login_id.clone(),
        action: PreferenceAction::Upsert(patch),
    }
}
