use crate::app::response::{ApiError, ReviewResponse};
use crate::config::toml_config::ServerConfig;
use crate::domain::ports::ReviewProvider;
use crate::utils::error::Result;
use crate::utils::validation::validate_socket_addr;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct AppState {
    provider: Arc<dyn ReviewProvider>,
    default_error_message: Arc<str>,
}

pub fn router(provider: Arc<dyn ReviewProvider>, default_error_message: &str) -> Router {
    let state = AppState {
        provider,
        default_error_message: Arc::from(default_error_message),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/reviews/:domain", get(review_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(provider: Arc<dyn ReviewProvider>, config: &ServerConfig) -> Result<()> {
    let addr = validate_socket_addr("server.bind_address", &config.bind_address)?;
    let app = router(provider, &config.default_error_message);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Review API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Review API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn review_handler(State(state): State<AppState>, Path(domain): Path<String>) -> Response {
    match state.provider.get_review(&domain).await {
        Ok(Some(snapshot)) => (StatusCode::OK, Json(ReviewResponse::from(snapshot))).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            if !e.is_not_found() {
                tracing::debug!("Unexpected error occurred for domain: {}: {}", domain, e);
            }
            ApiError::from_review_error(&e, &state.default_error_message).into_response()
        }
    }
}
