//! Applies per-user decisions against the preference store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use autostop_core::result::AppResult;
use autostop_database::repositories::PreferenceRepository;
use autostop_entity::policy::{Decision, PreferenceAction};
use autostop_entity::preference::{PreferencePatch, ShutdownPreference};

/// Store the reconciler converges onto the computed state.
///
/// Implemented by the Postgres preference repository in production and by
/// an in-memory map in tests. Both writes are atomic per `user_id`; no
/// cross-user locking is needed.
#[async_trait]
pub trait PreferenceStore: Send + Sync + 'static {
    /// Merge a patch into the user's record, creating it if absent.
    async fn upsert(&self, user_id: Uuid, patch: &PreferencePatch) -> AppResult<ShutdownPreference>;

    /// Delete the user's record. Returns `true` if a record existed.
    async fn delete(&self, user_id: Uuid) -> AppResult<bool>;
}

#[async_trait]
impl PreferenceStore for PreferenceRepository {
    async fn upsert(&self, user_id: Uuid, patch: &PreferencePatch) -> AppResult<ShutdownPreference> {
        PreferenceRepository::upsert(self, user_id, patch).await
    }

    async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        PreferenceRepository::delete(self, user_id).await
    }
}

/// Outcome of applying one user's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The record was created or updated.
    Upserted,
    /// The record was deleted.
    Deleted,
    /// A delete was requested but no record existed.
    DeleteNoop,
    /// No rule applied; the store was not touched.
    Unchanged,
}

/// Applies decisions one user at a time, idempotently.
///
/// Applying the identical decision twice converges to the same persisted
/// state: upserts merge, deletes of absent rows are no-ops.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn PreferenceStore>,
}

impl Reconciler {
    /// Create a reconciler over a preference store.
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// Apply one decision. Each apply is audit-logged with the user and
    /// the outcome; failures are returned to the caller, which decides
    /// whether to continue with other users.
    pub async fn apply(&self, decision: &Decision) -> AppResult<ApplyOutcome> {
        match &decision.action {
            PreferenceAction::NoChange => {
                debug!(
                    user_id = %decision.user_id,
                    login_id = %decision.login_id,
                    "No rule applies; preferences left untouched"
                );
                Ok(ApplyOutcome::Unchanged)
            }
            PreferenceAction::Delete => {
                let existed = self.store.delete(decision.user_id).await?;
                if existed {
                    info!(
                        user_id = %decision.user_id,
                        login_id = %decision.login_id,
                        "Deleted auto-shutdown preference entry"
                    );
                    Ok(ApplyOutcome::Deleted)
                } else {
                    info!(
                        user_id = %decision.user_id,
                        login_id = %decision.login_id,
                        "No preference entry to delete"
                    );
                    Ok(ApplyOutcome::DeleteNoop)
                }
            }
            PreferenceAction::Upsert(patch) => {
                self.store.upsert(decision.user_id, patch).await?;
                info!(
                    user_id = %decision.user_id,
                    login_id = %decision.login_id,
                    patch = ?patch,
                    "Upserted auto-shutdown preference entry"
                );
                Ok(ApplyOutcome::Upserted)
            }
        }
    }
}
