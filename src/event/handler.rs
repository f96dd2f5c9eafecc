use std::any::Any;

/// Trait for components that react to rung events
///
/// A handler is shared by every worker of its endpoint, so several calls to
/// `handle` may run at the same time when the endpoint has more than one
/// worker. Any closure `Fn(T) + Send + Sync` is a handler.
pub trait EventHandler<T>: Send + Sync {
    /// Handle one message taken off the endpoint queue
    fn handle(&self, message: T);

    /// Label used in worker log lines; defaults to the handler's type name
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<T, F> EventHandler<T> for F
where
    F: Fn(T) + Send + Sync,
{
    fn handle(&self, message: T) {
        self(message)
    }
}

/// Handler that accepts any payload and ignores it
pub struct NoOpEventHandler;

impl<T> EventHandler<T> for NoOpEventHandler {
    fn handle(&self, _message: T) {}

    fn name(&self) -> &'static str {
        "NoOpEventHandler"
    }
}

/// Best-effort text of a caught handler panic
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
