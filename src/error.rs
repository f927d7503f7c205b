//! Configuration error types
//!
//! The simulation itself cannot fail; only loading a run's configuration can.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read
    Io {
        path: String,
        source: io::Error,
    },
    /// The config file is not valid JSON for [`crate::SimConfig`]
    Parse(serde_json::Error),
    /// A value is out of its usable range
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config '{}': {}", path, source)
            }
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid config value for '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
