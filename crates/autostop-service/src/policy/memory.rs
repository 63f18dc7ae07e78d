//! In-memory implementations of the policy engine's ports.
//!
//! Suitable for tests and single-process tooling; production wiring uses
//! the Postgres repositories instead.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use autostop_core::result::AppResult;
use autostop_entity::preference::{PreferencePatch, ShutdownPreference};
use autostop_entity::user::User;

use super::loader::SettingsSource;
use super::reconciler::PreferenceStore;
use super::service::UserDirectory;

/// In-memory user directory and preference store backed by shared maps.
///
/// Clones share state, so a test can hold one handle for assertions while
/// the service under test writes through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<Mutex<Vec<User>>>,
    prefs: Arc<Mutex<HashMap<Uuid, ShutdownPreference>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user and return the record.
    pub async fn add_user(&self, login_id: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            login_id: login_id.to_string(),
            full_name: None,
            created_at: Utc::now(),
        };
        self.users.lock().await.push(user.clone());
        user
    }

    /// Seed an existing preference row.
    pub async fn seed_preference(&self, pref: ShutdownPreference) {
        self.prefs.lock().await.insert(pref.user_id, pref);
    }

    /// Read back a preference row, if present.
    pub async fn preference(&self, user_id: Uuid) -> Option<ShutdownPreference> {
        self.prefs.lock().await.get(&user_id).cloned()
    }

    /// Number of stored preference rows.
    pub async fn preference_count(&self) -> usize {
        self.prefs.lock().await.len()
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn enumerate_with_preferences(
        &self,
    ) -> AppResult<Vec<(User, Option<ShutdownPreference>)>> {
        let mut users = self.users.lock().await.clone();
        users.sort_by(|a, b| a.login_id.cmp(&b.login_id));

        let prefs = self.prefs.lock().await;
        Ok(users
            .into_iter()
            .map(|user| {
                let pref = prefs.get(&user.id).cloned();
                (user, pref)
            })
            .collect())
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn upsert(&self, user_id: Uuid, patch: &PreferencePatch) -> AppResult<ShutdownPreference> {
        let mut prefs = self.prefs.lock().await;
        let pref = prefs
            .entry(user_id)
            .or_insert_with(|| ShutdownPreference::new_for_user(user_id));
        patch.apply_to(pref);
        pref.updated_at = Some(Utc::now());
        Ok(pref.clone())
    }

    async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        Ok(self.prefs.lock().await.remove(&user_id).is_some())
    }
}

/// In-memory central config keyed by `(namespace, key)`.
///
/// Tracks how many lookups were served so tests can assert that rejected
/// requests never reach the config source.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: Arc<Mutex<HashMap<(String, String), String>>>,
    reads: Arc<AtomicUsize>,
}

impl MemorySettings {
    /// Store a raw config value.
    pub async fn set(&self, namespace: &str, key: &str, value: &str) {
        self.values
            .lock()
            .await
            .insert((namespace.to_string(), key.to_string()), value.to_string());
    }

    /// Number of lookups served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsSource for MemorySettings {
    async fn fetch_value(&self, namespace: &str, key: &str) -> AppResult<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .values
            .lock()
            .await
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }
}
