use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use iris_dispatch::EventRunner;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::WebhookAuth;
use crate::config::BotConfig;
use crate::error::ServerError;
use crate::routes::create_router;

/// Shared state of the webhook routes
#[derive(Clone)]
pub struct AppState {
    pub runner: EventRunner,
    pub auth: Arc<WebhookAuth>,
}

impl AppState {
    pub fn new(runner: EventRunner, auth: WebhookAuth) -> Self {
        Self {
            runner,
            auth: Arc::new(auth),
        }
    }
}

/// Router with state and tracing applied, ready to serve.
pub fn build_app(state: AppState, path: &str) -> Router {
    create_router(path)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the webhook until Ctrl+C.
pub async fn serve(runner: EventRunner, config: BotConfig) -> Result<(), ServerError> {
    let address = format!("{}:{}", config.server.host, config.server.port);
    let addr = address
        .parse::<SocketAddr>()
        .map_err(|source| ServerError::Address {
            address: address.clone(),
            source,
        })?;
    let path = config.server.route_path();

    let auth = WebhookAuth::new(config.secret, config.user_id);
    let app = build_app(AppState::new(runner, auth), &path);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Handling successfully started on {}{}. Press Ctrl+C to stop it", addr, path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to wait for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
