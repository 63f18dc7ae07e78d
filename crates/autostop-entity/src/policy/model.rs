//! Global policy snapshot read from central config.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Central-config key names for the policy values.
///
/// These are the `(namespace, key)` pairs stored in the `config` table;
/// the same names appear in operator-facing skip messages.
pub mod keys {
    /// Namespace all policy keys live under.
    pub const NAMESPACE: &str = "common";
    /// Master switch for workspace auto-shutdown.
    pub const AUTO_SHUTDOWN_ENABLED: &str = "workbench.workspaceAutoShutdown.isEnabled";
    /// Upper bound on per-user lifetime caps.
    pub const GLOBAL_MAX_LIFETIME: &str =
        "workbench.workspaceAutoShutdown.globalMaximumLifetimeInSeconds";
    /// Lifetime applied to users covered by override-to-default.
    pub const GLOBAL_DEFAULT_LIFETIME: &str =
        "workbench.workspaceAutoShutdown.globalDefaultLifetimeInSeconds";
    /// Master switch for long-running-session notifications.
    pub const NOTIFICATIONS_ENABLED: &str = "workbench.workloadNotifications.isEnabled";
    /// Notification period for long-running sessions.
    pub const NOTIFICATION_PERIOD: &str =
        "workbench.workloadNotifications.longRunningWorkloadDefinitionInSeconds";
}

/// Immutable snapshot of the global auto-shutdown policy.
///
/// Assembled once per request from the central config table and never
/// mutated afterwards; every per-user decision reads the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownPolicy {
    /// Whether workspace auto-shutdown is enabled at all.
    pub auto_shutdown_enabled: bool,
    /// Global maximum workspace lifetime in seconds.
    pub global_max_lifetime_seconds: i64,
    /// Global default workspace lifetime in seconds.
    pub global_default_lifetime_seconds: i64,
    /// Whether long-running-session notifications are enabled.
    pub notifications_enabled: bool,
    /// Notification period in seconds.
    pub notification_period_seconds: i64,
}

impl ShutdownPolicy {
    /// Validate the snapshot before any per-user work.
    ///
    /// A failed check short-circuits the entire operation: no per-user
    /// decision is produced and nothing is written.
    pub fn check(&self) -> Result<(), PolicySkip> {
        if !self.auto_shutdown_enabled {
            return Err(PolicySkip::Disabled);
        }
        if self.global_default_lifetime_seconds == 0 {
            return Err(PolicySkip::DefaultUnset);
        }
        if self.global_default_lifetime_seconds > self.global_max_lifetime_seconds {
            return Err(PolicySkip::DefaultExceedsMax);
        }
        Ok(())
    }
}

/// Reason the whole operation was skipped without touching any record.
///
/// This is a descriptive no-op outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySkip {
    /// Auto-shutdown is globally disabled.
    Disabled,
    /// No global default lifetime is configured.
    DefaultUnset,
    /// The configured default exceeds the configured maximum.
    DefaultExceedsMax,
}

impl fmt::Display for PolicySkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "{} is false", keys::AUTO_SHUTDOWN_ENABLED),
            Self::DefaultUnset => write!(f, "{} is not set", keys::GLOBAL_DEFAULT_LIFETIME),
            Self::DefaultExceedsMax => write!(
                f,
                "{} is greater than {}",
                keys::GLOBAL_DEFAULT_LIFETIME,
                keys::GLOBAL_MAX_LIFETIME
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_policy() -> ShutdownPolicy {
        ShutdownPolicy {
            auto_shutdown_enabled: true,
            global_max_lifetime_seconds: 7200,
            global_default_lifetime_seconds: 3600,
            notifications_enabled: false,
            notification_period_seconds: 0,
        }
    }

    #[test]
    fn valid_policy_passes_check() {
        assert_eq!(valid_policy().check(), Ok(()));
    }

    #[test]
    fn disabled_policy_short_circuits() {
        let policy = ShutdownPolicy {
            auto_shutdown_enabled: false,
            ..valid_policy()
        };
        assert_eq!(policy.check(), Err(PolicySkip::Disabled));
    }

    #[test]
    fn zero_default_short_circuits() {
        let policy = ShutdownPolicy {
            global_default_lifetime_seconds: 0,
            ..valid_policy()
        };
        assert_eq!(policy.check(), Err(PolicySkip::DefaultUnset));
    }

    #[test]
    fn default_above_max_short_circuits() {
        let policy = ShutdownPolicy {
            global_default_lifetime_seconds: 7201,
            ..valid_policy()
        };
        assert_eq!(policy.check(), Err(PolicySkip::DefaultExceedsMax));
    }

    #[test]
    fn default_equal_to_max_is_allowed() {
        let policy = ShutdownPolicy {
            global_default_lifetime_seconds: 7200,
            ..valid_policy()
        };
        assert_eq!(policy.check(), Ok(()));
    }

    #[test]
    fn skip_messages_name_the_config_key() {
        assert!(
            PolicySkip::Disabled
                .to_string()
                .contains(keys::AUTO_SHUTDOWN_ENABLED)
        );
        assert!(
            PolicySkip::DefaultExceedsMax
                .to_string()
                .contains(keys::GLOBAL_MAX_LIFETIME)
        );
    }
}
