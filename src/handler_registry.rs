use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::debug;

use crate::event::{Method, TypedEvent};
use crate::handler::{EventHandler, FnHandler, HandlerResult};

/// A handler bound to the event kind it listens for.
#[derive(Clone)]
pub struct HandlerRegistration {
    pub method: Method,
    pub handler: Arc<dyn EventHandler>,
}

/// Ordered list of handler registrations.
///
/// Filled once at startup, then moved into the [`Dispatcher`](crate::Dispatcher)
/// which only ever reads it.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    registrations: Vec<HandlerRegistration>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler for `method`. Handlers for the same method are
    /// invoked in registration order.
    pub fn register<H>(&mut self, method: Method, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.register_arc(method, Arc::new(handler));
    }

    pub fn register_arc(&mut self, method: Method, handler: Arc<dyn EventHandler>) {
        debug!("Registered new handler {} for {}", handler.name(), method);
        self.registrations.push(HandlerRegistration { method, handler });
    }

    /// Registers a named closure.
    pub fn register_fn<F>(&mut self, method: Method, name: impl Into<String>, func: F)
    where
        F: Fn(Arc<TypedEvent>) -> BoxFuture<'static, HandlerResult> + Send + Sync + 'static,
    {
        self.register(method, FnHandler::new(name, func));
    }

    /// Handlers registered for `method`, in registration order.
    pub fn lookup(&self, method: Method) -> Vec<Arc<dyn EventHandler>> {
        self.registrations
            .iter()
            .filter(|registration| registration.method == method)
            .map(|registration| registration.handler.clone())
            .collect()
    }

    /// Methods with at least one handler, in order of first registration.
    pub fn methods(&self) -> Vec<Method> {
        let mut methods: Vec<Method> = Vec::new();
        for registration in &self.registrations {
            if !methods.contains(&registration.method) {
                methods.push(registration.method);
            }
        }
        methods
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.registrations
                    .iter()
                    .map(|r| (r.method, r.handler.name())),
            )
            .finish()
    }
}
