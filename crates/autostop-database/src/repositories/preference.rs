//! Preference repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use autostop_core::error::{AppError, ErrorKind};
use autostop_core::result::AppResult;
use autostop_entity::preference::{PreferencePatch, ShutdownPreference};

/// Repository for per-user auto-shutdown preference rows.
///
/// All writes are keyed by `user_id` (one row per user); the store's
/// atomic upsert/delete-by-key is the only synchronization the rule
/// engine relies on.
#[derive(Debug, Clone)]
pub struct PreferenceRepository {
    pool: PgPool,
}

impl PreferenceRepository {
    /// Create a new preference repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Merge a patch into a user's preference row, creating it if absent.
    ///
    /// Runs as a single statement so that fields the patch keeps are never
    /// rewritten: each column is guarded by an apply flag and falls back to
    /// the stored value on conflict. On first insert, kept nullable columns
    /// start out NULL.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        patch: &PreferencePatch,
    ) -> AppResult<ShutdownPreference> {
        let lifetime = &patch.maximum_workspace_lifetime_seconds;

        sqlx::query_as::<_, ShutdownPreference>(
            "INSERT INTO user_preferences AS p (\
                 user_id, enable_workspace_auto_shutdown, \
                 maximum_workspace_lifetime_seconds, enable_session_notifications, \
                 session_notification_period, notify_about_collaborator_additions, \
                 updated_at) \
             VALUES ($1, COALESCE($2, FALSE), CASE WHEN $5 THEN $4 END, \
                     CASE WHEN $7 THEN $6 END, CASE WHEN $9 THEN $8 END, \
                     CASE WHEN $11 THEN $10 END, NOW()) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 enable_workspace_auto_shutdown = \
                     CASE WHEN $3 THEN COALESCE($2, FALSE) \
                          ELSE p.enable_workspace_auto_shutdown END, \
                 maximum_workspace_lifetime_seconds = \
                     CASE WHEN $5 THEN $4 \
                          ELSE p.maximum_workspace_lifetime_seconds END, \
                 enable_session_notifications = \
                     CASE WHEN $7 THEN $6 \
                          ELSE p.enable_session_notifications END, \
                 session_notification_period = \
                     CASE WHEN $9 THEN $8 \
                          ELSE p.session_notification_period END, \
                 notify_about_collaborator_additions = \
                     CASE WHEN $11 THEN $10 \
                          ELSE p.notify_about_collaborator_additions END, \
                 updated_at = NOW() \
             RETURNING *",
        )
        .bind(user_id)
        .bind(patch.enable_workspace_auto_shutdown)
        .bind(patch.enable_workspace_auto_shutdown.is_some())
        .bind(lifetime.applied_value())
        .bind(lifetime.is_applied())
        .bind(patch.enable_session_notifications)
        .bind(patch.enable_session_notifications.is_some())
        .bind(patch.session_notification_period)
        .bind(patch.session_notification_period.is_some())
        .bind(patch.notify_about_collaborator_additions)
        .bind(patch.notify_about_collaborator_additions.is_some())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to upsert preferences for user {user_id}"),
                e,
            )
        })
    }

    /// Delete a user's preference row. Returns `true` if a row existed.
    ///
    /// Deleting an absent row is an idempotent no-op.
    pub async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_preferences WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to delete preferences for user {user_id}"),
                    e,
                )
            })?;

        Ok(result.rows_affected() > 0)
    }
}
