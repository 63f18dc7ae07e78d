//! Orchestration of the auto-shutdown rules operation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use autostop_auth::Authorizer;
use autostop_core::error::AppError;
use autostop_core::result::AppResult;
use autostop_database::repositories::UserRepository;
use autostop_entity::policy::{PolicySkip, RuleOverrides};
use autostop_entity::preference::ShutdownPreference;
use autostop_entity::user::User;

use super::loader::PolicyLoader;
use super::reconciler::{ApplyOutcome, Reconciler};
use super::resolver::resolve;

/// Enumerates every known user joined with their preference record.
///
/// Left-outer-join semantics: each user appears exactly once, with a
/// record if and only if one exists.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Produce the full user/preference join, one entry per user.
    async fn enumerate_with_preferences(
        &self,
    ) -> AppResult<Vec<(User, Option<ShutdownPreference>)>>;
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn enumerate_with_preferences(
        &self,
    ) -> AppResult<Vec<(User, Option<ShutdownPreference>)>> {
        UserRepository::enumerate_with_preferences(self).await
    }
}

/// Counts of what one rules invocation did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    /// Users enumerated.
    pub total: u64,
    /// Records created or updated.
    pub upserted: u64,
    /// Delete decisions applied (including no-op deletes of absent rows).
    pub deleted: u64,
    /// Users no rule applied to.
    pub unchanged: u64,
    /// Users whose apply failed.
    pub failed: u64,
}

/// Result of one rules invocation.
#[derive(Debug, Clone)]
pub enum RulesOutcome {
    /// A global policy guard failed; nothing was written.
    Skipped(PolicySkip),
    /// The per-user loop ran to completion.
    Applied(ApplySummary),
}

/// The auto-shutdown rules operation: authorize, load the policy
/// snapshot, guard, enumerate, then resolve-and-apply per user.
#[derive(Clone)]
pub struct RulesService {
    authorizer: Arc<dyn Authorizer>,
    loader: PolicyLoader,
    directory: Arc<dyn UserDirectory>,
    reconciler: Reconciler,
}

impl RulesService {
    /// Create the service from its collaborators.
    pub fn new(
        authorizer: Arc<dyn Authorizer>,
        loader: PolicyLoader,
        directory: Arc<dyn UserDirectory>,
        reconciler: Reconciler,
    ) -> Self {
        Self {
            authorizer,
            loader,
            directory,
            reconciler,
        }
    }

    /// Apply auto-shutdown rules for every known user.
    ///
    /// Rejected credentials abort before any config read or enumeration.
    /// A failed global guard is a descriptive no-op, not an error. Per-user
    /// apply failures are logged and counted without aborting the remaining
    /// users; only an invocation where every single apply failed surfaces
    /// as an error.
    pub async fn apply_rules(
        &self,
        api_key: &str,
        overrides: &RuleOverrides,
    ) -> AppResult<RulesOutcome> {
        if !self.authorizer.is_authorized(api_key).await? {
            return Err(AppError::authorization(
                "Must be a platform admin or one of the allowed users",
            ));
        }

        let policy = self.loader.load().await?;
        info!(?policy, "Collected auto-shutdown values from central config");

        if let Err(skip) = policy.check() {
            info!(reason = %skip, "Global policy check failed; no changes made");
            return Ok(RulesOutcome::Skipped(skip));
        }

        let users = self.directory.enumerate_with_preferences().await?;

        let mut summary = ApplySummary::default();
        for (user, prior) in &users {
            summary.total += 1;
            let decision = resolve(&policy, overrides, user, prior.as_ref());

            match self.reconciler.apply(&decision).await {
                Ok(ApplyOutcome::Upserted) => summary.upserted += 1,
                Ok(ApplyOutcome::Deleted | ApplyOutcome::DeleteNoop) => summary.deleted += 1,
                Ok(ApplyOutcome::Unchanged) => summary.unchanged += 1,
                Err(e) => {
                    warn!(
                        user_id = %user.id,
                        login_id = %user.login_id,
                        error = %e,
                        "Failed to apply auto-shutdown decision"
                    );
                    summary.failed += 1;
                }
            }
        }

        if summary.total > 0 && summary.failed == summary.total {
            return Err(AppError::database(format!(
                "All {} preference updates failed",
                summary.total
            )));
        }

        info!(
            total = summary.total,
            upserted = summary.upserted,
            deleted = summary.deleted,
            unchanged = summary.unchanged,
            failed = summary.failed,
            "Workspace auto-shutdown reconciliation complete"
        );

        Ok(RulesOutcome::Applied(summary))
    }
}

#[cfg(test)]
mod tests {
    use autostop_auth::AllowAllAuthorizer;
    use autostop_core::error::ErrorKind;
    use autostop_entity::policy::model::keys;
    use autostop_entity::preference::PreferencePatch;
    use uuid::Uuid;

    use super::super::memory::{MemorySettings, MemoryStore};
    use super::super::reconciler::PreferenceStore;
    use super::*;

    struct DenyAllAuthorizer;

    #[async_trait]
    impl Authorizer for DenyAllAuthorizer {
        async fn is_authorized(&self, _api_key: &str) -> AppResult<bool> {
            Ok(false)
        }
    }

    /// Store whose writes always fail, for failure-isolation tests.
    struct BrokenStore;

    #[async_trait]
    impl PreferenceStore for BrokenStore {
        async fn upsert(
            &self,
            _user_id: Uuid,
            _patch: &PreferencePatch,
        ) -> AppResult<ShutdownPreference> {
            Err(AppError::database("write refused"))
        }

        async fn delete(&self, _user_id: Uuid) -> AppResult<bool> {
            Err(AppError::database("write refused"))
        }
    }

    /// Store failing writes for a single user, for isolation tests.
    struct SelectiveStore {
        inner: MemoryStore,
        broken_user: Uuid,
    }

    #[async_trait]
    impl PreferenceStore for SelectiveStore {
        async fn upsert(
            &self,
            user_id: Uuid,
            patch: &PreferencePatch,
        ) -> AppResult<ShutdownPreference> {
            if user_id == self.broken_user {
                return Err(AppError::database("write refused"));
            }
            self.inner.upsert(user_id, patch).await
        }

        async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
            if user_id == self.broken_user {
                return Err(AppError::database("write refused"));
            }
            self.inner.delete(user_id).await
        }
    }

    async fn valid_settings() -> MemorySettings {
        let settings = MemorySettings::default();
        settings.set(keys::NAMESPACE, keys::AUTO_SHUTDOWN_ENABLED, "true").await;
        settings.set(keys::NAMESPACE, keys::GLOBAL_MAX_LIFETIME, "7200").await;
        settings.set(keys::NAMESPACE, keys::GLOBAL_DEFAULT_LIFETIME, "3600").await;
        settings.set(keys::NAMESPACE, keys::NOTIFICATIONS_ENABLED, "false").await;
        settings.set(keys::NAMESPACE, keys::NOTIFICATION_PERIOD, "0").await;
        settings
    }

    fn service_over(
        authorizer: Arc<dyn Authorizer>,
        settings: MemorySettings,
        store: MemoryStore,
    ) -> RulesService {
        RulesService::new(
            authorizer,
            PolicyLoader::new(Arc::new(settings)),
            Arc::new(store.clone()),
            Reconciler::new(Arc::new(store)),
        )
    }

    fn expect_summary(outcome: RulesOutcome) -> ApplySummary {
        match outcome {
            RulesOutcome::Applied(summary) => summary,
            RulesOutcome::Skipped(reason) => panic!("unexpected skip: {reason}"),
        }
    }

    #[tokio::test]
    async fn override_and_default_scenario() {
        // alice has no prior record and an explicit override at the global
        // max; bob has a prior 1800s cap and falls through to the default.
        let store = MemoryStore::new();
        let alice = store.add_user("alice").await;
        let bob = store.add_user("bob").await;
        store
            .seed_preference(ShutdownPreference {
                maximum_workspace_lifetime_seconds: Some(1800),
                enable_session_notifications: Some(false),
                ..ShutdownPreference::new_for_user(bob.id)
            })
            .await;

        let service = service_over(
            Arc::new(AllowAllAuthorizer),
            valid_settings().await,
            store.clone(),
        );

        let overrides = RuleOverrides {
            users: [("alice".to_string(), 7200)].into_iter().collect(),
            override_to_default: true,
        };
        let summary = expect_summary(service.apply_rules("key", &overrides).await.unwrap());

        assert_eq!(summary.total, 2);
        assert_eq!(summary.upserted, 2);
        assert_eq!(summary.failed, 0);

        let alice_pref = store.preference(alice.id).await.unwrap();
        assert_eq!(alice_pref.maximum_workspace_lifetime_seconds, Some(7200));
        assert_eq!(alice_pref.notify_about_collaborator_additions, Some(true));
        assert!(alice_pref.enable_workspace_auto_shutdown);

        let bob_pref = store.preference(bob.id).await.unwrap();
        assert_eq!(bob_pref.maximum_workspace_lifetime_seconds, Some(3600));
        // Bob's unrelated fields are untouched.
        assert_eq!(bob_pref.enable_session_notifications, Some(false));
        assert_eq!(bob_pref.notify_about_collaborator_additions, None);
    }

    #[tokio::test]
    async fn negative_override_removes_the_record() {
        let store = MemoryStore::new();
        let carol = store.add_user("carol").await;
        store
            .seed_preference(ShutdownPreference {
                maximum_workspace_lifetime_seconds: Some(1800),
                ..ShutdownPreference::new_for_user(carol.id)
            })
            .await;

        let service = service_over(
            Arc::new(AllowAllAuthorizer),
            valid_settings().await,
            store.clone(),
        );

        let overrides = RuleOverrides {
            users: [("carol".to_string(), -1)].into_iter().collect(),
            override_to_default: false,
        };
        let summary = expect_summary(service.apply_rules("key", &overrides).await.unwrap());

        assert_eq!(summary.deleted, 1);
        assert!(store.preference(carol.id).await.is_none());
    }

    #[tokio::test]
    async fn disabled_policy_writes_nothing() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice").await;

        let settings = valid_settings().await;
        settings
            .set(keys::NAMESPACE, keys::AUTO_SHUTDOWN_ENABLED, "false")
            .await;

        let service = service_over(Arc::new(AllowAllAuthorizer), settings, store.clone());

        let overrides = RuleOverrides {
            users: [("alice".to_string(), 7200)].into_iter().collect(),
            override_to_default: true,
        };
        let outcome = service.apply_rules("key", &overrides).await.unwrap();

        assert!(matches!(
            outcome,
            RulesOutcome::Skipped(PolicySkip::Disabled)
        ));
        assert!(store.preference(alice.id).await.is_none());
        assert_eq!(store.preference_count().await, 0);
    }

    #[tokio::test]
    async fn default_above_max_writes_nothing() {
        let store = MemoryStore::new();
        store.add_user("alice").await;

        let settings = valid_settings().await;
        settings
            .set(keys::NAMESPACE, keys::GLOBAL_DEFAULT_LIFETIME, "9000")
            .await;

        let service = service_over(Arc::new(AllowAllAuthorizer), settings, store.clone());
        let outcome = service
            .apply_rules("key", &RuleOverrides::default())
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            RulesOutcome::Skipped(PolicySkip::DefaultExceedsMax)
        ));
        assert_eq!(store.preference_count().await, 0);
    }

    #[tokio::test]
    async fn unauthorized_caller_reads_no_config_and_writes_nothing() {
        let store = MemoryStore::new();
        store.add_user("alice").await;
        let settings = valid_settings().await;
        let reads_before = settings.reads();

        let service = service_over(Arc::new(DenyAllAuthorizer), settings.clone(), store.clone());

        let overrides = RuleOverrides {
            users: [("alice".to_string(), 7200)].into_iter().collect(),
            override_to_default: true,
        };
        let err = service.apply_rules("bad-key", &overrides).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(settings.reads(), reads_before);
        assert_eq!(store.preference_count().await, 0);
    }

    #[tokio::test]
    async fn applying_twice_is_idempotent() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice").await;

        let service = service_over(
            Arc::new(AllowAllAuthorizer),
            valid_settings().await,
            store.clone(),
        );

        let overrides = RuleOverrides {
            users: Default::default(),
            override_to_default: true,
        };

        expect_summary(service.apply_rules("key", &overrides).await.unwrap());
        let first = store.preference(alice.id).await.unwrap();

        expect_summary(service.apply_rules("key", &overrides).await.unwrap());
        let second = store.preference(alice.id).await.unwrap();

        assert_eq!(store.preference_count().await, 1);
        assert_eq!(
            first.maximum_workspace_lifetime_seconds,
            second.maximum_workspace_lifetime_seconds
        );
        // The one-time collaborator default is not re-set on the second
        // pass, but the stored value survives the merge.
        assert_eq!(first.notify_about_collaborator_additions, Some(true));
        assert_eq!(second.notify_about_collaborator_additions, Some(true));
    }

    #[tokio::test]
    async fn zero_override_upserts_with_no_cap() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice").await;
        store
            .seed_preference(ShutdownPreference {
                maximum_workspace_lifetime_seconds: Some(1800),
                ..ShutdownPreference::new_for_user(alice.id)
            })
            .await;

        let service = service_over(
            Arc::new(AllowAllAuthorizer),
            valid_settings().await,
            store.clone(),
        );

        let overrides = RuleOverrides {
            users: [("alice".to_string(), 0)].into_iter().collect(),
            override_to_default: false,
        };
        expect_summary(service.apply_rules("key", &overrides).await.unwrap());

        let pref = store.preference(alice.id).await.unwrap();
        assert_eq!(pref.maximum_workspace_lifetime_seconds, None);
        assert!(pref.enable_workspace_auto_shutdown);
    }

    #[tokio::test]
    async fn users_without_rules_are_left_alone() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice").await;
        let dave = store.add_user("dave").await;

        let service = service_over(
            Arc::new(AllowAllAuthorizer),
            valid_settings().await,
            store.clone(),
        );

        let overrides = RuleOverrides {
            users: [("alice".to_string(), 7200)].into_iter().collect(),
            override_to_default: false,
        };
        let summary = expect_summary(service.apply_rules("key", &overrides).await.unwrap());

        assert_eq!(summary.upserted, 1);
        assert_eq!(summary.unchanged, 1);
        assert!(store.preference(alice.id).await.is_some());
        assert!(store.preference(dave.id).await.is_none());
    }

    #[tokio::test]
    async fn total_write_failure_surfaces_as_an_error() {
        let store = MemoryStore::new();
        store.add_user("alice").await;

        let service = RulesService::new(
            Arc::new(AllowAllAuthorizer),
            PolicyLoader::new(Arc::new(valid_settings().await)),
            Arc::new(store),
            Reconciler::new(Arc::new(BrokenStore)),
        );

        let overrides = RuleOverrides {
            users: Default::default(),
            override_to_default: true,
        };
        let err = service.apply_rules("key", &overrides).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }

    #[tokio::test]
    async fn one_failing_user_does_not_block_the_rest() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice").await;
        let bob = store.add_user("bob").await;

        let selective = SelectiveStore {
            inner: store.clone(),
            broken_user: alice.id,
        };

        let service = RulesService::new(
            Arc::new(AllowAllAuthorizer),
            PolicyLoader::new(Arc::new(valid_settings().await)),
            Arc::new(store.clone()),
            Reconciler::new(Arc::new(selective)),
        );

        let overrides = RuleOverrides {
            users: Default::default(),
            override_to_default: true,
        };
        let summary = expect_summary(service.apply_rules("key", &overrides).await.unwrap());

        assert_eq!(summary.total, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.upserted, 1);
        assert!(store.preference(alice.id).await.is_none());
        assert!(store.preference(bob.id).await.is_some());
    }

    #[tokio::test]
    async fn unchanged_users_do_not_count_as_failures() {
        // Every decision is NoChange, so a broken store is never touched
        // and the invocation still succeeds.
        let store = MemoryStore::new();
        store.add_user("alice").await;

        let service = RulesService::new(
            Arc::new(AllowAllAuthorizer),
            PolicyLoader::new(Arc::new(valid_settings().await)),
            Arc::new(store),
            Reconciler::new(Arc::new(BrokenStore)),
        );

        let summary = expect_summary(
            service
                .apply_rules("key", &RuleOverrides::default())
                .await
                .unwrap(),
        );
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.failed, 0);
    }
}
