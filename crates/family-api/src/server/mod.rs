//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use family_common::{AppConfig, AppError, ConfigError};
use family_core::DirectoryService;
use family_directory::InMemoryDirectory;
use family_sync::FamilyDirectorySync;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(router);
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let directory = InMemoryDirectory::from_config(&config.directory);
    info!(
        account_id = %config.directory.account_id,
        status = %config.directory.account_status,
        seeded = config.directory.seed_sample,
        "In-memory directory ready"
    );
    create_app_state_with(config, Arc::new(directory))
}

/// Create AppState on top of an existing directory service
pub fn create_app_state_with(
    config: AppConfig,
    directory: Arc<dyn DirectoryService>,
) -> Result<AppState, AppError> {
    let sync = FamilyDirectorySync::from_config(directory, &config.sync, &config.invite)
        .map_err(|e| ConfigError::InvalidValue("INVITE_BASE_URL", e.to_string()))?;
    Ok(AppState::new(sync, config))
}

/// Kick off the account check in the background when configured to
pub fn spawn_startup_check(state: &AppState) {
    if state.config().sync.check_on_startup {
        let sync = state.sync().clone();
        tokio::spawn(async move { sync.check_account_status().await });
        info!("Startup account check scheduled");
    }
}

/// Run the HTTP server
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Server(e.to_string()))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Server(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.api.address();
    let addr: SocketAddr = address
        .parse()
        .map_err(|_| ConfigError::InvalidValue("API_HOST", address.clone()))?;

    let state = create_app_state(config)?;
    spawn_startup_check(&state);

    let app = create_app(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind to {addr}: {e}")))?;

    run_server(app, listener).await
}
