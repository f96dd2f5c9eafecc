use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, instrument, warn};

use super::dispatcher::broadcast;
use super::endpoint::{Endpoint, EndpointInfo};
use super::handler::EventHandler;
use super::message::Message;
use super::tracker::CompletionTracker;
use crate::config::BellConfig;
use crate::shared::BellError;

/// Thread-safe map of event names to their listening endpoints
///
/// Cloning a registry is cheap and yields a handle to the same listeners.
/// Endpoints stop once the last handle is dropped.
pub struct Registry<T> {
    channels: Arc<RwLock<Channels<T>>>,
    tracker: Arc<CompletionTracker>,
}

struct Channels<T> {
    /// Endpoints per event, in registration order; never holds an empty Vec
    endpoints: HashMap<String, Vec<Endpoint<T>>>,
    queue_size: usize,
}

impl<T> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
            tracker: Arc::clone(&self.tracker),
        }
    }
}

impl<T: Clone + Send + 'static> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Registry<T> {
    /// Creates an empty registry with unbuffered endpoints
    pub fn new() -> Self {
        Self::with_queue_size(0)
    }

    pub fn with_queue_size(queue_size: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(Channels {
                endpoints: HashMap::new(),
                queue_size,
            })),
            tracker: Arc::new(CompletionTracker::new()),
        }
    }

    pub fn from_config(config: &BellConfig) -> Self {
        Self::with_queue_size(config.queue_size)
    }

    /// Sets the queue capacity of endpoints created from now on
    ///
    /// Endpoints that already exist keep the capacity they were built with.
    pub fn queue(&self, size: usize) -> &Self {
        self.write().queue_size = size;
        debug!(queue_size = size, "Queue size updated");
        self
    }

    pub fn queue_size(&self) -> usize {
        self.read().queue_size
    }

    /// Subscribes `handler` to `event` with a single worker
    pub fn listen<H>(&self, event: &str, handler: H) -> Result<(), BellError>
    where
        H: EventHandler<T> + 'static,
    {
        self.listen_n(event, handler, 1)
    }

    /// Subscribes `handler` to `event` with `copies` workers sharing one queue
    ///
    /// The workers compete for messages: extra copies raise throughput, they
    /// do not replay a message. A `copies` of zero is treated as one.
    #[instrument(skip(self, handler))]
    pub fn listen_n<H>(&self, event: &str, handler: H, copies: usize) -> Result<(), BellError>
    where
        H: EventHandler<T> + 'static,
    {
        if event.is_empty() {
            return Err(BellError::InvalidEvent(event.to_string()));
        }

        let copies = if copies == 0 {
            warn!(event = %event, "listen_n called with zero copies - starting one worker");
            1
        } else {
            copies
        };

        let handler_name = handler.name();
        let handler: Arc<dyn EventHandler<T>> = Arc::new(handler);

        let mut channels = self.write();
        let endpoint = Endpoint::spawn(
            event,
            handler,
            copies,
            channels.queue_size,
            Arc::clone(&self.tracker),
        )?;

        info!(
            event = %event,
            endpoint = %endpoint.id(),
            handler = handler_name,
            workers = copies,
            capacity = channels.queue_size,
            "Listener registered"
        );

        channels
            .endpoints
            .entry(event.to_string())
            .or_default()
            .push(endpoint);
        Ok(())
    }

    /// Broadcasts `message` to every endpoint listening on `event`
    ///
    /// Returns once each endpoint has accepted the message, not once the
    /// handlers ran. Blocks while a target queue is full.
    pub fn ring(&self, event: &str, message: T) -> Result<(), BellError> {
        let channels = self.read();

        let Some(endpoints) = channels.endpoints.get(event) else {
            debug!(event = %event, "Bell rung with no listeners");
            return Err(BellError::NotFound(event.to_string()));
        };

        let delivered = broadcast(event, endpoints, message, &self.tracker);
        debug!(
            event = %event,
            endpoints = endpoints.len(),
            delivered,
            "Bell rung"
        );
        Ok(())
    }

    /// Checks if there are listeners for the event
    pub fn has(&self, event: &str) -> bool {
        self.read().endpoints.contains_key(event)
    }

    /// Returns the events that have listeners, in no particular order
    pub fn list(&self) -> Vec<String> {
        self.read().endpoints.keys().cloned().collect()
    }

    /// Describes the endpoints of `event`, in registration order
    pub fn endpoints(&self, event: &str) -> Vec<EndpointInfo> {
        self.read()
            .endpoints
            .get(event)
            .map(|endpoints| endpoints.iter().map(Endpoint::info).collect())
            .unwrap_or_default()
    }

    /// Messages rung but not yet handled, across all events
    pub fn pending(&self) -> usize {
        self.tracker.pending()
    }

    /// Removes every listener of the named events, stopping their workers
    ///
    /// An empty `names` removes every event. Handlers already running finish
    /// normally; messages still buffered are drained before workers exit.
    #[instrument(skip(self, names), fields(count = names.len()))]
    pub fn remove<S: AsRef<str>>(&self, names: &[S]) {
        let mut channels = self.write();

        let targets: Vec<String> = if names.is_empty() {
            channels.endpoints.keys().cloned().collect()
        } else {
            names.iter().map(|name| name.as_ref().to_string()).collect()
        };

        for name in targets {
            if let Some(endpoints) = channels.endpoints.remove(&name) {
                let count = endpoints.len();
                for mut endpoint in endpoints {
                    endpoint.close();
                }
                info!(event = %name, endpoints = count, "Listeners removed");
            }
        }
    }

    pub fn remove_all(&self) {
        self.remove::<&str>(&[]);
    }

    /// Blocks until every message rung so far has been handled
    ///
    /// Messages rung while waiting extend the wait. Listening, removing and
    /// ringing stay available to other threads in the meantime.
    pub fn wait(&self) {
        debug!(pending = self.tracker.pending(), "Waiting for handlers");
        self.tracker.wait();
    }

    fn read(&self) -> RwLockReadGuard<'_, Channels<T>> {
        self.channels.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Channels<T>> {
        self.channels.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone + Send + 'static> Registry<T> {
    /// [`Registry::ring`] for async callers; back-pressure blocks a pool thread instead of the runtime
    pub async fn ring_async(&self, event: impl Into<String>, message: T) -> Result<(), BellError> {
        let registry = self.clone();
        let event = event.into();
        tokio::task::spawn_blocking(move || registry.ring(&event, message))
            .await
            .map_err(|e| BellError::Join(e.to_string()))?
    }

    /// [`Registry::wait`] for async callers
    pub async fn wait_async(&self) -> Result<(), BellError> {
        let registry = self.clone();
        tokio::task::spawn_blocking(move || registry.wait())
            .await
            .map_err(|e| BellError::Join(e.to_string()))
    }
}

impl Registry<Message> {
    /// Wraps `value` in a [`Message`] stamped with `event` and the current time, then rings it
    pub fn ring_value<V: Any + Send + Sync>(&self, event: &str, value: V) -> Result<(), BellError> {
        self.ring(event, Message::new(event, value))
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Registry")
            .field("events", &channels.endpoints.len())
            .field("queue_size", &channels.queue_size)
            .field("pending", &self.tracker.pending())
            .finish()
    }
}
