// ABOUTME: Application-wide error types for barua.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::platform::ExternalApiError;
use crate::publish::PublishError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("validation failed with {0} error(s)")]
    ValidationFailed(usize),

    #[error("{failed} of {total} item(s) failed to publish")]
    BatchFailed { failed: usize, total: usize },

    #[error("{failed} of {total} item(s) failed to restore")]
    RollbackIncomplete { failed: usize, total: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Api(#[from] ExternalApiError),
}

pub type Result<T> = std::result::Result<T, Error>;
