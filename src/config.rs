use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shared::BellError;

/// Environment variable read by [`BellConfig::from_env`]
pub const QUEUE_SIZE_ENV: &str = "BELL_QUEUE_SIZE";

/// Settings for a registry
///
/// Every field is optional when deserialized, so the struct can be embedded
/// in a host application's own config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BellConfig {
    /// Buffer capacity of endpoints created from this config; 0 means every
    /// ring waits for a worker to take the message.
    pub queue_size: usize,
}

impl BellConfig {
    pub fn new(queue_size: usize) -> Self {
        Self { queue_size }
    }

    /// Loads the config from `BELL_QUEUE_SIZE`, defaulting when it is unset
    pub fn from_env() -> Result<Self, BellError> {
        match std::env::var(QUEUE_SIZE_ENV) {
            Ok(raw) => {
                let queue_size = parse_queue_size(&raw)?;
                debug!(queue_size, "Loaded bell config from environment");
                Ok(Self::new(queue_size))
            }
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(BellError::Config(format!("{QUEUE_SIZE_ENV}: {e}"))),
        }
    }
}

fn parse_queue_size(raw: &str) -> Result<usize, BellError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|e| BellError::Config(format!("{QUEUE_SIZE_ENV}={raw:?}: {e}")))
}
