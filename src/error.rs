//! Error types for world loading and queries.
//!
//! Lookup misses are not errors here: they come back as `None`.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorldError {
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse document: {0}")]
    Parse(String),

    #[error("Invalid value for field '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl WorldError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        WorldError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for WorldError {
    fn from(err: serde_json::Error) -> Self {
        WorldError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for WorldError {
    fn from(err: toml::de::Error) -> Self {
        WorldError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WorldError>;
