//! Auto-shutdown rules handler.

use axum::extract::State;
use axum::Json;

use autostop_service::RulesOutcome;

use crate::dto::request::AutoShutdownRulesRequest;
use crate::dto::response::RulesResponse;
use crate::error::ApiError;
use crate::extractors::ApiKey;
use crate::state::AppState;

/// POST /autoshutdownrules
///
/// A globally disabled or misconfigured policy is not an error: it
/// returns 200 with an explanatory no-changes message.
pub async fn apply_rules(
    State(state): State<AppState>,
    ApiKey(api_key): ApiKey,
    Json(payload): Json<AutoShutdownRulesRequest>,
) -> Result<Json<RulesResponse>, ApiError> {
    let overrides = payload.into_overrides();

    let outcome = state.rules_service.apply_rules(&api_key, &overrides).await?;

    let response = match outcome {
        RulesOutcome::Skipped(reason) => RulesResponse {
            msg: format!("{reason}. No changes made"),
            summary: None,
        },
        RulesOutcome::Applied(summary) => RulesResponse {
            msg: "Workspace auto-shutdown durations updated".to_string(),
            summary: Some(summary),
        },
    };

    Ok(Json(response))
}
