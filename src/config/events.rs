//! Event publishing configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Event publishing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Pub/sub channel room lifecycle events are published to
    #[serde(default = "default_channel")]
    pub channel: String,
}

impl EventsConfig {
    /// Validate event configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.channel.trim().is_empty() {
            return Err(ValidationError::EmptyEventChannel);
        }
        Ok(())
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
        }
    }
}

fn default_channel() -> String {
    "room.events".to_string()
}
