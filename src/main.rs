//! Cirrus Autostop Server — workspace auto-shutdown policy service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use autostop_api::router::build_router;
use autostop_api::state::AppState;
use autostop_auth::{AclRules, AllowAllAuthorizer, Authorizer, PrincipalClient, RemoteAuthorizer};
use autostop_core::config::AppConfig;
use autostop_core::error::AppError;
use autostop_database::connection::DatabasePool;
use autostop_database::repositories::{PreferenceRepository, SettingsRepository, UserRepository};
use autostop_service::{PolicyLoader, Reconciler, RulesService};

#[tokio::main]
async fn main() {
    let env = std::env::var("AUTOSTOP_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting autostop server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database).await?;

    autostop_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Repositories ─────────────────────────────────────
    let settings_repo = Arc::new(SettingsRepository::new(db.pool().clone()));
    let user_repo = Arc::new(UserRepository::new(db.pool().clone()));
    let preference_repo = Arc::new(PreferenceRepository::new(db.pool().clone()));

    // ── Step 3: Authorization gate ───────────────────────────────
    let authorizer: Arc<dyn Authorizer> = if config.auth.allow_all {
        tracing::warn!("Authorization disabled: allowing every caller");
        Arc::new(AllowAllAuthorizer)
    } else {
        let acl = AclRules::load(&config.auth.admins_file)?;
        tracing::info!(
            allowed_users = acl.users.len(),
            file = %config.auth.admins_file,
            "Loaded admin ACL file"
        );
        let client = PrincipalClient::new(&config.identity)?;
        Arc::new(RemoteAuthorizer::new(client, acl))
    };

    // ── Step 4: Rule engine ──────────────────────────────────────
    let loader = PolicyLoader::new(settings_repo);
    let reconciler = Reconciler::new(preference_repo);
    let rules_service = Arc::new(RulesService::new(
        authorizer,
        loader,
        user_repo,
        reconciler,
    ));

    // ── Step 5: Build and start HTTP server ──────────────────────
    let state = AppState { rules_service };
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("autostop server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    tracing::info!("autostop server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
