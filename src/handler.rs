use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use thiserror::Error;

use crate::event::TypedEvent;

/// Failure reported by a handler. Any error a handler returns ends up here.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    pub fn failed<S: Into<String>>(message: S) -> Self {
        HandlerError::Failed(message.into())
    }
}

pub type HandlerResult = Result<(), HandlerError>;

/// Asynchronous callback invoked once for every matching event.
///
/// Handlers run on the tokio runtime and must be `Send + Sync`; the return value
/// only signals success or failure. Every handler of one event receives the
/// same shared event.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Identifies the handler in logs.
    fn name(&self) -> String;

    async fn handle(&self, event: Arc<TypedEvent>) -> HandlerResult;
}

type HandlerFn = Box<dyn Fn(Arc<TypedEvent>) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Adapts a named closure into an [`EventHandler`].
pub struct FnHandler {
    name: String,
    func: HandlerFn,
}

impl FnHandler {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Arc<TypedEvent>) -> BoxFuture<'static, HandlerResult> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }
}

#[async_trait]
impl EventHandler for FnHandler {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn handle(&self, event: Arc<TypedEvent>) -> HandlerResult {
        (self.func)(event).await
    }
}

impl std::fmt::Debug for FnHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler").field("name", &self.name).finish()
    }
}
