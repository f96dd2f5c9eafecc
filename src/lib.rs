//! In-process event bell: named events, independent listeners, worker pools.
//!
//! ```
//! use bell::{Message, Registry};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let events: Registry<Message> = Registry::new();
//! let greeted = Arc::new(AtomicUsize::new(0));
//! let counter = greeted.clone();
//! events
//!     .listen("event_name", move |msg: Message| {
//!         if msg.value::<&str>() == Some(&"Hello bell!") {
//!             counter.fetch_add(1, Ordering::SeqCst);
//!         }
//!     })
//!     .unwrap();
//!
//! events.ring_value("event_name", "Hello bell!").unwrap();
//! events.wait();
//! assert_eq!(greeted.load(Ordering::SeqCst), 1);
//! ```

pub mod config;
pub mod event;
pub mod shared;

mod global;

// Re-export commonly used types for easier access
pub use config::BellConfig;
pub use event::{EndpointInfo, EventHandler, Message, NoOpEventHandler, Registry};
pub use global::{
    default_registry, has, list, listen, listen_n, queue, remove, remove_all, ring, wait,
};
pub use shared::BellError;
