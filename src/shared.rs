use thiserror::Error;

/// Errors surfaced by the bell registry
#[derive(Error, Debug)]
pub enum BellError {
    #[error("channel {0} not found")]
    NotFound(String),

    #[error("Invalid event name: {0:?}")]
    InvalidEvent(String),

    #[error("Failed to spawn worker for {event}: {source}")]
    Spawn {
        event: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Join(String),
}

impl BellError {
    /// The event name this error refers to, if any
    pub fn event(&self) -> Option<&str> {
        match self {
            BellError::NotFound(event) | BellError::InvalidEvent(event) => Some(event),
            BellError::Spawn { event, .. } => Some(event),
            BellError::Config(_) | BellError::Join(_) => None,
        }
    }

    /// Whether this error means nobody is listening for the event
    pub fn is_not_found(&self) -> bool {
        matches!(self, BellError::NotFound(_))
    }
}
