use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or composing an operation registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse registry: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Operation '{0}' is defined more than once")]
    DuplicateOperation(String),

    #[error("Operation with an empty name")]
    EmptyName,

    #[error("Invalid argument in operation '{operation}': {reason}")]
    InvalidArgument { operation: String, reason: String },

    #[error("Callback entry '{0}' has no matching operation")]
    OrphanCallback(String),
}
