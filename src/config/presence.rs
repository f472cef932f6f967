//! Presence configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::identity::IdentityMode;

/// Settings for the realtime endpoint and its lifecycle logging.
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceConfig {
    /// How new connections are attributed to identities
    #[serde(default)]
    pub identity_mode: IdentityMode,

    /// Queue length between lifecycle events and the log sink
    #[serde(default = "default_log_buffer_capacity")]
    pub log_buffer_capacity: usize,
}

impl PresenceConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.log_buffer_capacity == 0 {
            return Err(ValidationError::InvalidLogBuffer);
        }
        Ok(())
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            identity_mode: IdentityMode::default(),
            log_buffer_capacity: default_log_buffer_capacity(),
        }
    }
}

fn default_log_buffer_capacity() -> usize {
    1024
}
