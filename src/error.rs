//! Error types for catalog builds.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while writing or reading index documents.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Top-level error returned by catalog operations and CLI commands.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required upstream input (record feed, dictionary) is absent.
    #[error("Missing {what}: {} does not exist", path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0} naming collision(s) detected; refusing to write output")]
    NameCollision(usize),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
