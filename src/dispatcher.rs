//! # Dispatch Engine
//!
//! Decodes one raw event and runs every handler registered for its method.
//!
//! ```text
//! Received ──decode──▶ Decoded ──lookup──▶ Dispatched(N) ──▶ Done
//!     │                                                      ▲
//!     └────────────── decode failure ────────────────────────┘
//! ```
//!
//! Handlers of one event run one after another in registration order. Each
//! invocation runs in its own task; however it fails, the failure is logged
//! and the next handler still runs. Nothing propagates past
//! [`Dispatcher::process_event`].

use std::{any::Any, sync::Arc, time::Duration};

use thiserror::Error;
use tracing::{debug, error, info, Instrument};

use crate::{
    config::DispatchConfig,
    event::{decode, CatalogError, Method, RawEvent, TypedEvent},
    handler::EventHandler,
    handler_registry::HandlerRegistry,
};

/// Why a single handler invocation did not succeed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvocationError {
    #[error("{0}")]
    Returned(String),
    #[error("panicked: {0}")]
    Panicked(String),
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    #[error("cancelled before completion")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerFailure {
    pub handler: String,
    pub error: InvocationError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub method: Method,
    pub chat: Option<String>,
    pub succeeded: usize,
    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    pub fn invoked(&self) -> usize {
        self.succeeded + self.failures.len()
    }
}

/// What happened to one raw event.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The payload could not be decoded; no handler ran.
    Rejected(CatalogError),
    /// Decoded, but nothing is registered for its method.
    Unhandled(Method),
    Dispatched(DispatchReport),
}

impl DispatchOutcome {
    pub fn report(&self) -> Option<&DispatchReport> {
        match self {
            DispatchOutcome::Dispatched(report) => Some(report),
            _ => None,
        }
    }
}

pub struct Dispatcher {
    registry: HandlerRegistry,
    handler_timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry,
            handler_timeout: None,
        }
    }

    pub fn with_config(registry: HandlerRegistry, config: &DispatchConfig) -> Self {
        Self {
            registry,
            handler_timeout: config.handler_timeout,
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub async fn process_event(&self, raw: RawEvent) -> DispatchOutcome {
        let event = match decode(raw) {
            Ok(event) => event,
            Err(e) => {
                error!("Failed to decode event: {}", e);
                return DispatchOutcome::Rejected(e);
            }
        };

        let method = event.method();
        let handlers = self.registry.lookup(method);
        if handlers.is_empty() {
            debug!("No handler registered for {}", method);
            return DispatchOutcome::Unhandled(method);
        }

        let event = Arc::new(event);
        let mut report = DispatchReport {
            method,
            chat: event.chat().map(str::to_string),
            succeeded: 0,
            failures: Vec::new(),
        };

        for handler in handlers {
            let name = handler.name();
            match self.invoke(handler, event.clone()).await {
                Ok(()) => report.succeeded += 1,
                Err(e) => {
                    error!("Error in handler {} for {}: {}", name, method, e);
                    report.failures.push(HandlerFailure {
                        handler: name,
                        error: e,
                    });
                }
            }
        }

        if report.succeeded > 0 {
            info!(
                "-> NEW EVENT {} FROM CHAT {}",
                method,
                report.chat.as_deref().unwrap_or("-")
            );
        }

        DispatchOutcome::Dispatched(report)
    }

    async fn invoke(
        &self,
        handler: Arc<dyn EventHandler>,
        event: Arc<TypedEvent>,
    ) -> Result<(), InvocationError> {
        let task = tokio::spawn(async move { handler.handle(event).await }.in_current_span());

        let joined = match self.handler_timeout {
            Some(limit) => {
                let abort = task.abort_handle();
                match tokio::time::timeout(limit, task).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        abort.abort();
                        return Err(InvocationError::TimedOut(limit));
                    }
                }
            }
            None => task.await,
        };

        match joined {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(InvocationError::Returned(e.to_string())),
            Err(e) if e.is_panic() => Err(InvocationError::Panicked(panic_message(e.into_panic()))),
            Err(_) => Err(InvocationError::Cancelled),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{HandlerError, MockEventHandler};
    use futures::FutureExt;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::io;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogCapture {
        fn install(&self) -> tracing::subscriber::DefaultGuard {
            let writer = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::DEBUG)
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        fn count(&self, level: &str) -> usize {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf)
                .lines()
                .filter(|line| line.contains(&format!(" {} ", level)))
                .count()
        }

        fn contains(&self, text: &str) -> bool {
            String::from_utf8_lossy(&self.0.lock().unwrap()).contains(text)
        }
    }

    fn raw(value: Value) -> RawEvent {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    fn ping() -> RawEvent {
        raw(json!({ "method": "ping", "user_id": 1, "secret": "s" }))
    }

    fn bind_chat() -> RawEvent {
        raw(json!({ "method": "bindChat", "user_id": 1, "object": { "chat": "abcd" } }))
    }

    fn mock_handler(name: &str, succeed: bool) -> MockEventHandler {
        let mut handler = MockEventHandler::new();
        handler.expect_name().return_const(name.to_string());
        handler
            .expect_handle()
            .withf(|event| event.method() == Method::Ping)
            .times(1)
            .returning(move |_| {
                if succeed {
                    Ok(())
                } else {
                    Err(HandlerError::failed("handler refused"))
                }
            });
        handler
    }

    fn explode() -> crate::handler::HandlerResult {
        panic!("handler exploded")
    }

    fn counting(registry: &mut HandlerRegistry, method: Method, counter: &Arc<AtomicUsize>) {
        let counter = counter.clone();
        registry.register_fn(method, "counter", move |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            .boxed()
        });
    }

    #[tokio::test]
    async fn test_two_handlers_both_invoked_once() {
        let logs = LogCapture::default();
        let _guard = logs.install();

        let mut registry = HandlerRegistry::new();
        registry.register(Method::Ping, mock_handler("h1", true));
        registry.register(Method::Ping, mock_handler("h2", true));
        let dispatcher = Dispatcher::new(registry);

        let outcome = dispatcher.process_event(ping()).await;
        let report = outcome.report().unwrap();

        assert_eq!(report.method, Method::Ping);
        assert_eq!(report.succeeded, 2);
        assert!(report.failures.is_empty());
        assert_eq!(logs.count("INFO"), 1);
        assert!(logs.contains("-> NEW EVENT ping FROM CHAT -"));
    }

    #[tokio::test]
    async fn test_unknown_method_is_logged_and_dropped() {
        let logs = LogCapture::default();
        let _guard = logs.install();

        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = HandlerRegistry::new();
        counting(&mut registry, Method::Ping, &calls);
        let dispatcher = Dispatcher::new(registry);

        let outcome = dispatcher
            .process_event(raw(json!({ "method": "not_a_real_method" })))
            .await;

        assert!(matches!(
            outcome,
            DispatchOutcome::Rejected(CatalogError::UnknownMethod { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(logs.count("ERROR"), 1);

        // still usable afterwards
        let outcome = dispatcher.process_event(ping()).await;
        assert_eq!(outcome.report().map(|r| r.succeeded), Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.registry().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_event_is_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = HandlerRegistry::new();
        counting(&mut registry, Method::BindChat, &calls);
        let dispatcher = Dispatcher::new(registry);

        let outcome = dispatcher
            .process_event(raw(json!({ "method": "bindChat", "user_id": 1 })))
            .await;

        assert!(matches!(
            outcome,
            DispatchOutcome::Rejected(CatalogError::MalformedEvent {
                method: Method::BindChat,
                ..
            })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_handlers_is_silent() {
        let logs = LogCapture::default();
        let _guard = logs.install();

        let dispatcher = Dispatcher::new(HandlerRegistry::new());
        let outcome = dispatcher.process_event(bind_chat()).await;

        assert!(matches!(outcome, DispatchOutcome::Unhandled(Method::BindChat)));
        assert_eq!(logs.count("ERROR"), 0);
        assert_eq!(logs.count("INFO"), 0);
    }

    #[tokio::test]
    async fn test_failing_handler_is_isolated() {
        let logs = LogCapture::default();
        let _guard = logs.install();

        let mut registry = HandlerRegistry::new();
        registry.register(Method::Ping, mock_handler("first", true));
        registry.register(Method::Ping, mock_handler("broken", false));
        registry.register(Method::Ping, mock_handler("third", true));
        let dispatcher = Dispatcher::new(registry);

        let outcome = dispatcher.process_event(ping()).await;
        let report = outcome.report().unwrap();

        assert_eq!(report.invoked(), 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(
            report.failures,
            vec![HandlerFailure {
                handler: "broken".to_string(),
                error: InvocationError::Returned("handler refused".to_string()),
            }]
        );
        assert_eq!(logs.count("ERROR"), 1);
        assert!(logs.contains("Error in handler broken for ping: handler refused"));
    }

    #[tokio::test]
    async fn test_panicking_handler_is_isolated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = HandlerRegistry::new();
        registry.register_fn(Method::BindChat, "panics", |_| async { explode() }.boxed());
        counting(&mut registry, Method::BindChat, &calls);
        let dispatcher = Dispatcher::new(registry);

        let outcome = dispatcher.process_event(bind_chat()).await;
        let report = outcome.report().unwrap();

        assert_eq!(report.chat.as_deref(), Some("abcd"));
        assert_eq!(report.succeeded, 1);
        assert_eq!(
            report.failures[0].error,
            InvocationError::Panicked("handler exploded".to_string())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_timeout() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = HandlerRegistry::new();
        registry.register_fn(Method::Ping, "stuck", |_| {
            async {
                futures::future::pending::<()>().await;
                Ok(())
            }
            .boxed()
        });
        counting(&mut registry, Method::Ping, &calls);

        let config = DispatchConfig {
            handler_timeout: Some(Duration::from_millis(50)),
            ..Default::default()
        };
        let dispatcher = Dispatcher::with_config(registry, &config);

        let outcome = dispatcher.process_event(ping()).await;
        let report = outcome.report().unwrap();

        assert_eq!(
            report.failures[0].error,
            InvocationError::TimedOut(Duration::from_millis(50))
        );
        assert_eq!(report.succeeded, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_runtime_shutdown_cancels_pending_handler() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();

        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let started_tx = Mutex::new(started_tx);
        let mut registry = HandlerRegistry::new();
        registry.register_fn(Method::Ping, "stuck", move |_| {
            let _ = started_tx.lock().unwrap().send(());
            async {
                futures::future::pending::<()>().await;
                Ok(())
            }
            .boxed()
        });
        let dispatcher = Dispatcher::new(registry);

        // The first poll spawns the handler task onto `runtime`.
        let mut dispatch = Box::pin(dispatcher.process_event(ping()));
        {
            let _entered = runtime.enter();
            assert!((&mut dispatch).now_or_never().is_none());
        }
        started_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("handler never started");

        runtime.shutdown_timeout(Duration::from_secs(5));

        let outcome = futures::executor::block_on(dispatch);
        let report = outcome.report().unwrap();
        assert_eq!(report.succeeded, 0);
        assert_eq!(
            report.failures,
            vec![HandlerFailure {
                handler: "stuck".to_string(),
                error: InvocationError::Cancelled,
            }]
        );
    }

    #[tokio::test]
    async fn test_handlers_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HandlerRegistry::new();
        for name in ["a", "b", "c"] {
            let order = order.clone();
            registry.register_fn(Method::BindChat, name, move |_| {
                let order = order.clone();
                async move {
                    tokio::task::yield_now().await;
                    order.lock().unwrap().push(name);
                    Ok(())
                }
                .boxed()
            });
        }
        let dispatcher = Dispatcher::new(registry);

        dispatcher.process_event(bind_chat()).await;

        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new("owned".to_string())), "owned");
        assert_eq!(panic_message(Box::new(3)), "unknown panic payload");
    }
}
