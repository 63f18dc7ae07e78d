//! Response DTOs.

use serde::{Deserialize, Serialize};

use autostop_service::ApplySummary;

/// Body of a successful `POST /autoshutdownrules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesResponse {
    /// Human-readable outcome message.
    pub msg: String,
    /// Apply counts, present when the per-user loop actually ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ApplySummary>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}
