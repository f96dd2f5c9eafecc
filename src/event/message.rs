use chrono::{DateTime, Utc};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Payload delivered to handlers of the default registry
///
/// Carries an arbitrary value together with the event that rang it and the
/// moment it was rung. The value sits behind an `Arc`, so each endpoint gets a
/// cheap clone of the same value.
///
/// Handlers get no cancellation signal from the bus. A handler that must be
/// interruptible should receive a payload that carries one (for example an
/// `Arc<AtomicBool>` or a `tokio::sync::watch::Receiver`) and poll it.
#[derive(Clone)]
pub struct Message {
    event: String,
    timestamp: DateTime<Utc>,
    value: Arc<dyn Any + Send + Sync>,
}

impl Message {
    /// Wraps `value` for `event`, stamped with the current time
    pub fn new<V: Any + Send + Sync>(event: impl Into<String>, value: V) -> Self {
        Self {
            event: event.into(),
            timestamp: Utc::now(),
            value: Arc::new(value),
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Borrow the payload as `V`, or `None` if it holds another type
    pub fn value<V: Any>(&self) -> Option<&V> {
        self.value.downcast_ref::<V>()
    }

    pub fn is<V: Any>(&self) -> bool {
        self.value.is::<V>()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("event", &self.event)
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct CustomStruct {
        name: &'static str,
        param: i32,
    }

    #[test]
    fn test_value_downcasts_to_original_type() {
        let message = Message::new(
            "event_name",
            CustomStruct {
                name: "testName",
                param: 12,
            },
        );

        assert_eq!(message.event(), "event_name");
        assert!(message.is::<CustomStruct>());
        assert_eq!(
            message.value::<CustomStruct>(),
            Some(&CustomStruct {
                name: "testName",
                param: 12
            })
        );
    }

    #[test]
    fn test_value_wrong_type_is_none() {
        let message = Message::new("ping", 42_i32);

        assert_eq!(message.value::<i32>(), Some(&42));
        assert!(message.value::<i64>().is_none());
        assert!(!message.is::<String>());
    }

    #[test]
    fn test_clone_shares_value_and_timestamp() {
        let before = Utc::now();
        let message = Message::new("ping", String::from("hello"));
        let copy = message.clone();

        assert!(message.timestamp() >= before);
        assert_eq!(copy.timestamp(), message.timestamp());
        assert!(std::ptr::eq(
            copy.value::<String>().unwrap(),
            message.value::<String>().unwrap()
        ));
    }

    #[test]
    fn test_debug_omits_value() {
        let message = Message::new("ping", 1_u8);
        let rendered = format!("{:?}", message);

        assert!(rendered.contains("ping"));
        assert!(rendered.contains(".."));
    }
}
