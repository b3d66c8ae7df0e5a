use std::sync::Arc;

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::{
    dispatcher::{DispatchOutcome, Dispatcher},
    event::RawEvent,
    Error, DispatchResult,
};

/// Feeds raw events into a [`Dispatcher`], one independent task per event.
///
/// Scheduling never waits for dispatch to finish, so a slow handler for one
/// event cannot hold back its siblings.
#[derive(Clone)]
pub struct EventRunner {
    dispatcher: Arc<Dispatcher>,
    handle: Handle,
}

impl EventRunner {
    /// Binds to the tokio runtime the caller is running on.
    pub fn new(dispatcher: Dispatcher) -> DispatchResult<Self> {
        let handle = Handle::try_current().map_err(|e| Error::Runtime(e.to_string()))?;
        Ok(Self::with_handle(dispatcher, handle))
    }

    pub fn with_handle(dispatcher: Dispatcher, handle: Handle) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            handle,
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Schedules one event and returns without waiting for it.
    pub fn process_event(&self, raw: RawEvent) -> JoinHandle<DispatchOutcome> {
        let dispatch_id = Uuid::new_v4();
        let span = info_span!("dispatch", %dispatch_id);
        let dispatcher = self.dispatcher.clone();
        self.handle
            .spawn(async move { dispatcher.process_event(raw).await }.instrument(span))
    }

    /// Schedules every event of the batch. Returns once all are scheduled;
    /// the handles can be awaited by callers that want the outcomes.
    pub fn process_events<I>(&self, batch: I) -> Vec<JoinHandle<DispatchOutcome>>
    where
        I: IntoIterator<Item = RawEvent>,
    {
        let handles: Vec<_> = batch
            .into_iter()
            .map(|raw| self.process_event(raw))
            .collect();
        debug!("Scheduled {} event(s)", handles.len());
        handles
    }
}
