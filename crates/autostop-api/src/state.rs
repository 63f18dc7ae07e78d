//! Shared application state threaded through the router.

use std::sync::Arc;

use autostop_service::RulesService;

/// State available to all handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The rules operation.
    pub rules_service: Arc<RulesService>,
}
