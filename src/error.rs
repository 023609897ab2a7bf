//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// A schema rejected a field value.
///
/// The message is what ends up in the form's error map, so it should be
/// readable by the person filling in the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ValidationError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Errors raised while loading or saving a [`crate::FormConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid form config: {0}")]
    Parse(#[from] serde_json::Error),
}
