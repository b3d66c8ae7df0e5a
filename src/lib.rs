//! # iris-dispatch: Event Dispatching for Chat-Bot Webhooks
//!
//! The chat platform delivers events to a bot over HTTP. Each event is a JSON
//! object whose `method` key names its kind. This crate turns those payloads
//! into typed events and runs the asynchronous handlers registered for them.
//!
//! ## Components
//!
//! - Event catalog ([`event`]): method tags, typed records and decoding
//! - Handlers ([`handler`], [`handler_registry`]): the handler trait and the
//!   ordered registry filled at startup
//! - Dispatch engine ([`dispatcher`]): decode, look up and invoke handlers with
//!   per-handler failure isolation
//! - Runner ([`runner`]): schedules each event of a batch as its own task
//!
//! ## Pipeline
//!
//! ```text
//! HTTP receiver → RawEvent → EventRunner → Dispatcher → decode → handlers
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use futures::FutureExt;
//! use iris_dispatch::{Dispatcher, EventRunner, HandlerRegistry, Method};
//!
//! # async fn example() -> iris_dispatch::DispatchResult<()> {
//! let mut registry = HandlerRegistry::new();
//! registry.register_fn(Method::BindChat, "greet", |event| {
//!     async move {
//!         tracing::info!("bound to chat {:?}", event.chat());
//!         Ok(())
//!     }
//!     .boxed()
//! });
//!
//! let runner = EventRunner::new(Dispatcher::new(registry))?;
//! let payload = serde_json::json!({
//!     "method": "bindChat",
//!     "user_id": 1,
//!     "object": { "chat": "abcd" },
//! });
//! if let serde_json::Value::Object(raw) = payload {
//!     runner.process_events(vec![raw]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod handler;
pub mod handler_registry;
pub mod logging;
pub mod runner;

// Re-exports
pub use dispatcher::{DispatchOutcome, DispatchReport, Dispatcher};
pub use error::*;
pub use event::{Method, RawEvent, TypedEvent};
pub use handler::{EventHandler, FnHandler, HandlerError, HandlerResult};
pub use handler_registry::HandlerRegistry;
pub use runner::EventRunner;
