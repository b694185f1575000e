//! HTTP upload surface around the screening pipeline

pub mod errors;
pub mod handlers;
pub mod state;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use log::info;
use std::net::SocketAddr;

use crate::config::Config;
use crate::error::{Result, ScreenerError};
use crate::processing::catalog::RoleCatalog;
use crate::processing::embeddings::ModelContext;
use crate::processing::screening::Screener;
use crate::server::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/roles", get(handlers::list_roles))
        .route("/upload_resume", post(handlers::upload_resume))
        .route("/extract_text", post(handlers::extract_text))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Load the model and catalog, then serve until the process is stopped.
///
/// The model is loaded before binding so that a missing or broken model
/// stops start-up instead of failing the first request.
pub async fn serve(config: &Config, models: &ModelContext) -> Result<()> {
    config.ensure_upload_dir()?;

    let embedder = models.embedder().await?;
    let catalog = RoleCatalog::load_or_default(&config.catalog.roles_file);
    let screener = Screener::new(embedder, catalog, config.ranking.top_n);

    let state = AppState::new(screener, config.server.upload_dir.clone());
    let app = build_router(state, config.server.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            ScreenerError::Configuration(format!(
                "Invalid listen address {}:{}: {}",
                config.server.host, config.server.port, e
            ))
        })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| ScreenerError::Server(e.to_string()))?;

    Ok(())
}
