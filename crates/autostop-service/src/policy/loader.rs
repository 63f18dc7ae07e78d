//! Global policy snapshot loader.

use std::sync::Arc;

use async_trait::async_trait;

use autostop_core::error::AppError;
use autostop_core::result::AppResult;
use autostop_database::repositories::SettingsRepository;
use autostop_entity::policy::model::keys;
use autostop_entity::policy::ShutdownPolicy;

/// Source of central config values, keyed by `(namespace, key)`.
///
/// Implemented by the settings repository in production and by an
/// in-memory map in tests.
#[async_trait]
pub trait SettingsSource: Send + Sync + 'static {
    /// Fetch a single raw config value.
    async fn fetch_value(&self, namespace: &str, key: &str) -> AppResult<Option<String>>;
}

#[async_trait]
impl SettingsSource for SettingsRepository {
    async fn fetch_value(&self, namespace: &str, key: &str) -> AppResult<Option<String>> {
        SettingsRepository::fetch_value(self, namespace, key).await
    }
}

/// Assembles the immutable [`ShutdownPolicy`] snapshot from central config.
///
/// Missing keys default to `false`/`0`; a present but unparseable value is
/// a configuration error and fatal to the whole operation.
#[derive(Clone)]
pub struct PolicyLoader {
    settings: Arc<dyn SettingsSource>,
}

impl PolicyLoader {
    /// Create a loader over a settings source.
    pub fn new(settings: Arc<dyn SettingsSource>) -> Self {
        Self { settings }
    }

    /// Load the policy snapshot.
    pub async fn load(&self) -> AppResult<ShutdownPolicy> {
        Ok(ShutdownPolicy {
            auto_shutdown_enabled: self.fetch_bool(keys::AUTO_SHUTDOWN_ENABLED).await?,
            global_max_lifetime_seconds: self.fetch_i64(keys::GLOBAL_MAX_LIFETIME).await?,
            global_default_lifetime_seconds: self.fetch_i64(keys::GLOBAL_DEFAULT_LIFETIME).await?,
            notifications_enabled: self.fetch_bool(keys::NOTIFICATIONS_ENABLED).await?,
            notification_period_seconds: self.fetch_i64(keys::NOTIFICATION_PERIOD).await?,
        })
    }

    async fn fetch_bool(&self, key: &str) -> AppResult<bool> {
        match self.settings.fetch_value(keys::NAMESPACE, key).await? {
            None => Ok(false),
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::configuration(format!("Config value for '{key}' is not a boolean: {raw}"))
            }),
        }
    }

    async fn fetch_i64(&self, key: &str) -> AppResult<i64> {
        match self.settings.fetch_value(keys::NAMESPACE, key).await? {
            None => Ok(0),
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                AppError::configuration(format!("Config value for '{key}' is not an integer: {raw}"))
            }),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use autostop_core::error::ErrorKind;

    use super::super::memory::MemorySettings;
    use super::*;

    #[tokio::test]
    async fn missing_keys_default_to_false_and_zero() {
        let settings = MemorySettings::default();
        let loader = PolicyLoader::new(Arc::new(settings));

        let policy = loader.load().await.unwrap();
        assert!(!policy.auto_shutdown_enabled);
        assert_eq!(policy.global_max_lifetime_seconds, 0);
        assert_eq!(policy.global_default_lifetime_seconds, 0);
        assert!(!policy.notifications_enabled);
        assert_eq!(policy.notification_period_seconds, 0);
    }

    #[tokio::test]
    async fn loads_all_five_values() {
        let settings = MemorySettings::default();
        settings.set(keys::NAMESPACE, keys::AUTO_SHUTDOWN_ENABLED, "true").await;
        settings.set(keys::NAMESPACE, keys::GLOBAL_MAX_LIFETIME, "7200").await;
        settings.set(keys::NAMESPACE, keys::GLOBAL_DEFAULT_LIFETIME, "3600").await;
        settings.set(keys::NAMESPACE, keys::NOTIFICATIONS_ENABLED, "1").await;
        settings.set(keys::NAMESPACE, keys::NOTIFICATION_PERIOD, "600").await;

        let loader = PolicyLoader::new(Arc::new(settings));
        let policy = loader.load().await.unwrap();

        assert!(policy.auto_shutdown_enabled);
        assert_eq!(policy.global_max_lifetime_seconds, 7200);
        assert_eq!(policy.global_default_lifetime_seconds, 3600);
        assert!(policy.notifications_enabled);
        assert_eq!(policy.notification_period_seconds, 600);
    }

    #[tokio::test]
    async fn unparseable_value_is_a_configuration_error() {
        let settings = MemorySettings::default();
        settings
            .set(keys::NAMESPACE, keys::GLOBAL_MAX_LIFETIME, "not-a-number")
            .await;

        let loader = PolicyLoader::new(Arc::new(settings));
        let err = loader.load().await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(err.message.contains(keys::GLOBAL_MAX_LIFETIME));
    }
}
