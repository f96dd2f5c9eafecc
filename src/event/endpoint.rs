use crossbeam_channel::{bounded, Receiver, SendError, Sender};
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error};
use uuid::Uuid;

use super::handler::{panic_message, EventHandler};
use super::tracker::CompletionTracker;
use crate::shared::BellError;

/// Point-in-time view of one endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointInfo {
    pub id: Uuid,
    pub event: String,
    pub workers: usize,
    /// Messages the queue buffers before `ring` blocks
    pub capacity: usize,
}

/// One queue plus the pool of workers draining it
///
/// All workers read from the same receiver, so each message is handled by
/// exactly one of them. Dropping the sender (via [`Endpoint::close`] or by
/// dropping the endpoint) disconnects the queue and stops every worker once
/// the buffered messages are drained.
pub(crate) struct Endpoint<T> {
    id: Uuid,
    event: String,
    workers: usize,
    capacity: usize,
    sender: Option<Sender<T>>,
}

impl<T: Send + 'static> Endpoint<T> {
    /// Creates the queue and starts `copies` workers on it
    pub(crate) fn spawn(
        event: &str,
        handler: Arc<dyn EventHandler<T>>,
        copies: usize,
        capacity: usize,
        tracker: Arc<CompletionTracker>,
    ) -> Result<Self, BellError> {
        let id = Uuid::new_v4();
        let (sender, receiver) = bounded(capacity);

        for index in 0..copies {
            let worker = Worker {
                endpoint: id,
                event: event.to_string(),
                index,
                receiver: receiver.clone(),
                handler: Arc::clone(&handler),
                tracker: Arc::clone(&tracker),
            };

            // On failure `sender` is dropped, which stops the workers already started.
            thread::Builder::new()
                .name(format!("bell-{}-{}", id.simple(), index))
                .spawn(move || worker.run())
                .map_err(|source| BellError::Spawn {
                    event: event.to_string(),
                    source,
                })?;
        }

        Ok(Self {
            id,
            event: event.to_string(),
            workers: copies,
            capacity,
            sender: Some(sender),
        })
    }
}

impl<T> Endpoint<T> {
    pub(crate) fn id(&self) -> Uuid {
        self.id
    }

    /// Enqueues a message, blocking while the queue is full
    pub(crate) fn send(&self, message: T) -> Result<(), SendError<T>> {
        match &self.sender {
            Some(sender) => sender.send(message),
            None => Err(SendError(message)),
        }
    }

    /// Disconnects the queue; workers exit after draining what is buffered
    pub(crate) fn close(&mut self) {
        if self.sender.take().is_some() {
            debug!(
                endpoint = %self.id,
                event = %self.event,
                workers = self.workers,
                "Endpoint queue closed"
            );
        }
    }

    pub(crate) fn info(&self) -> EndpointInfo {
        EndpointInfo {
            id: self.id,
            event: self.event.clone(),
            workers: self.workers,
            capacity: self.capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    Running,
    Stopped,
}

struct Worker<T> {
    endpoint: Uuid,
    event: String,
    index: usize,
    receiver: Receiver<T>,
    handler: Arc<dyn EventHandler<T>>,
    tracker: Arc<CompletionTracker>,
}

impl<T> Worker<T> {
    fn run(self) {
        debug!(
            endpoint = %self.endpoint,
            event = %self.event,
            worker = self.index,
            "Worker started"
        );

        let mut state = WorkerState::Running;
        while state == WorkerState::Running {
            state = match self.receiver.recv() {
                Ok(message) => {
                    self.dispatch(message);
                    WorkerState::Running
                }
                Err(_) => WorkerState::Stopped,
            };
        }

        debug!(
            endpoint = %self.endpoint,
            event = %self.event,
            worker = self.index,
            "Worker stopped - queue closed"
        );
    }

    /// Runs the handler for one message; a panic is logged and the worker keeps going
    fn dispatch(&self, message: T) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.handler.handle(message)));

        if let Err(payload) = outcome {
            error!(
                endpoint = %self.endpoint,
                event = %self.event,
                worker = self.index,
                handler = self.handler.name(),
                panic = %panic_message(payload.as_ref()),
                "Handler panicked"
            );
        }

        self.tracker.done();
    }
}
