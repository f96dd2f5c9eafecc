// Listener registry and dispatch engine
//
// Events map to endpoints; each endpoint is a queue drained by its own pool
// of worker threads. Ringing an event fans a message out to every endpoint.

// Public API - what other modules can use
pub use endpoint::EndpointInfo;
pub use handler::{EventHandler, NoOpEventHandler};
pub use message::Message;
pub use registry::Registry;

// Internal modules
mod dispatcher;
mod endpoint;
mod handler;
mod message;
mod registry;
mod tracker;
