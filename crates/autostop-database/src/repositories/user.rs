//! User repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use autostop_core::error::{AppError, ErrorKind};
use autostop_core::result::AppResult;
use autostop_entity::preference::ShutdownPreference;
use autostop_entity::user::User;

/// Repository for user lookups and enumeration.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

/// Flattened row of the users/preferences left-outer join.
#[derive(Debug, sqlx::FromRow)]
struct UserPreferenceRow {
    id: Uuid,
    login_id: String,
    full_name: Option<String>,
    created_at: DateTime<Utc>,
    pref_user_id: Option<Uuid>,
    pref_enable_auto_shutdown: Option<bool>,
    pref_max_lifetime_seconds: Option<i64>,
    pref_enable_notifications: Option<bool>,
    pref_notification_period: Option<i64>,
    pref_notify_collaborators: Option<bool>,
    pref_updated_at: Option<DateTime<Utc>>,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Enumerate every known user joined with their preference record.
    ///
    /// Left-outer-join semantics: every user appears exactly once, with a
    /// preference record if and only if one exists. Ordered by login id so
    /// repeated runs produce the same sequence.
    pub async fn enumerate_with_preferences(
        &self,
    ) -> AppResult<Vec<(User, Option<ShutdownPreference>)>> {
        let rows = sqlx::query_as::<_, UserPreferenceRow>(
            "SELECT u.id, u.login_id, u.full_name, u.created_at, \
                    p.user_id AS pref_user_id, \
                    p.enable_workspace_auto_shutdown AS pref_enable_auto_shutdown, \
                    p.maximum_workspace_lifetime_seconds AS pref_max_lifetime_seconds, \
                    p.enable_session_notifications AS pref_enable_notifications, \
                    p.session_notification_period AS pref_notification_period, \
                    p.notify_about_collaborator_additions AS pref_notify_collaborators, \
                    p.updated_at AS pref_updated_at \
             FROM users u \
             LEFT JOIN user_preferences p ON p.user_id = u.id \
             ORDER BY u.login_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to enumerate users", e))?;

        Ok(rows.into_iter().map(split_row).collect())
    }
}

fn split_row(row: UserPreferenceRow) -> (User, Option<ShutdownPreference>) {
    let user = User {
        id: row.id,
        login_id: row.login_id,
        full_name: row.full_name,
        created_at: row.created_at,
    };

    let pref = row.pref_user_id.map(|user_id| ShutdownPreference {
        user_id,
        enable_workspace_auto_shutdown: row.pref_enable_auto_shutdown.unwrap_or(false),
        maximum_workspace_lifetime_seconds: row.pref_max_lifetime_seconds,
        enable_session_notifications: row.pref_enable_notifications,
        session_notification_period: row.pref_notification_period,
        notify_about_collaborator_additions: row.pref_notify_collaborators,
        updated_at: row.pref_updated_at,
    });

    (user, pref)
}
