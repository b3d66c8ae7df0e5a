//! Webhook receiver for iris-dispatch
//!
//! Accepts event POSTs from the chat platform, checks their credentials and
//! hands them to an [`EventRunner`](iris_dispatch::EventRunner).

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

use iris_dispatch::{Dispatcher, EventRunner, HandlerRegistry, logging};
use tracing::debug;

use config::BotConfig;
use error::ServerError;

/// Build the dispatcher from `registry`, set up logging and serve until Ctrl+C.
///
/// Log lines are the only record of rejected events and failing handlers, so
/// a logging setup failure stops startup.
pub async fn run_app(registry: HandlerRegistry, config: BotConfig) -> Result<(), ServerError> {
    logging::init(&config.dispatch.log)?;

    debug!(
        "Initialized dispatcher for user {} with {} handler(s)",
        config.user_id,
        registry.len()
    );

    let dispatcher = Dispatcher::with_config(registry, &config.dispatch);
    let runner = EventRunner::new(dispatcher)?;
    server::serve(runner, config).await
}
