use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::handlers::webhook::receive_events;
use crate::server::AppState;

/// Create the router: the webhook at `path` plus `/health`.
pub fn create_router(path: &str) -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route(path, post(receive_events))
}

/// Health check endpoint for container health monitoring
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
