//! Free functions bound to one process-wide [`Registry<Message>`].
//!
//! The default registry is created on first use from [`BellConfig::from_env`].
//! Code that needs isolation (tests, libraries) should build its own
//! [`Registry`] instead.

use std::any::Any;
use std::sync::LazyLock;
use tracing::warn;

use crate::config::BellConfig;
use crate::event::{EventHandler, Message, Registry};
use crate::shared::BellError;

static DEFAULT_REGISTRY: LazyLock<Registry<Message>> = LazyLock::new(|| {
    let config = BellConfig::from_env().unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring invalid bell configuration");
        BellConfig::default()
    });
    Registry::from_config(&config)
});

/// The shared registry behind the free functions of this crate
pub fn default_registry() -> &'static Registry<Message> {
    &DEFAULT_REGISTRY
}

/// Subscribe on event with one worker
pub fn listen<H>(event: &str, handler: H) -> Result<(), BellError>
where
    H: EventHandler<Message> + 'static,
{
    DEFAULT_REGISTRY.listen(event, handler)
}

/// Subscribe on event with `copies` competing workers
pub fn listen_n<H>(event: &str, handler: H, copies: usize) -> Result<(), BellError>
where
    H: EventHandler<Message> + 'static,
{
    DEFAULT_REGISTRY.listen_n(event, handler, copies)
}

/// Ring the bell: deliver `value` to every listener of `event`
pub fn ring<V: Any + Send + Sync>(event: &str, value: V) -> Result<(), BellError> {
    DEFAULT_REGISTRY.ring_value(event, value)
}

pub fn has(event: &str) -> bool {
    DEFAULT_REGISTRY.has(event)
}

pub fn list() -> Vec<String> {
    DEFAULT_REGISTRY.list()
}

/// Remove the listeners of the named events (all events when `names` is empty)
pub fn remove<S: AsRef<str>>(names: &[S]) {
    DEFAULT_REGISTRY.remove(names)
}

pub fn remove_all() {
    DEFAULT_REGISTRY.remove_all()
}

/// Block until every message rung on the default registry has been handled
pub fn wait() {
    DEFAULT_REGISTRY.wait()
}

/// Set the queue size of listeners added from now on
pub fn queue(size: usize) {
    DEFAULT_REGISTRY.queue(size);
}
