//! Central config repository.

use sqlx::PgPool;

use autostop_core::error::{AppError, ErrorKind};
use autostop_core::result::AppResult;

/// Repository for reading the platform's central `config` table.
///
/// Values are stored as text and parsed by the policy loader; this
/// repository only performs the keyed lookup.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    /// Create a new settings repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a single config value by `(namespace, key)`.
    pub async fn fetch_value(&self, namespace: &str, key: &str) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT value FROM config WHERE namespace = $1 AND key = $2",
        )
        .bind(namespace)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to fetch config value '{namespace}/{key}'"),
                e,
            )
        })
    }
}
