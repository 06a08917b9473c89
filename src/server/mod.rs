//! HTTP boundary for the query engine
//!
//! Maps query parameters to engine calls and serialises results; image
//! bytes themselves are served by a generic file service mounted at the
//! configured serve path, rooted at the configured root directory. The
//! engine only ever hands out URL fragments.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::ImgrError;
use crate::config::Settings;
use crate::query::QueryEngine;

pub mod error;
pub mod handlers;

pub use error::ApiError;

/// Shared state handed to every handler
pub struct AppState {
    pub engine: QueryEngine,
}

/// Build the application router
#[must_use]
pub fn router(settings: &Settings, engine: QueryEngine) -> Router {
    let state = Arc::new(AppState { engine });
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/images/random", get(handlers::random_image))
        .route("/api/images", get(handlers::gallery))
        .route("/api/folders", get(handlers::folders))
        .route("/api/tags", get(handlers::all_tags))
        .nest_service(
            &settings.serve_prefix(),
            ServeDir::new(&settings.root_path),
        )
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind and run the server until a shutdown signal arrives
///
/// # Errors
///
/// Returns `ImgrError::ServerError` if the listener cannot bind or the
/// server fails while running.
pub async fn serve(settings: Settings, engine: QueryEngine) -> Result<(), ImgrError> {
    let app = router(&settings, engine);

    let listener = TcpListener::bind(&settings.bind_addr)
        .await
        .map_err(|error| {
            ImgrError::ServerError(format!("failed to bind {}: {error}", settings.bind_addr))
        })?;
    let addr = listener
        .local_addr()
        .map_err(|error| ImgrError::ServerError(error.to_string()))?;
    tracing::info!(%addr, "imgr listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|error| ImgrError::ServerError(error.to_string()))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
