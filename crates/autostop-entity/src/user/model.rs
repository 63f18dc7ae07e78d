//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered workbench user.
///
/// User accounts are owned by the wider platform; this service only reads
/// them to enumerate whose auto-shutdown preferences need reconciling.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name used as the override-map key.
    pub login_id: String,
    /// Human-readable display name.
    pub full_name: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
