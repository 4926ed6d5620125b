//! Error types for configuration loading and driver resolution

use fopgen_codegen::TemplateError;
use fopgen_registry::RegistryError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Driver '{0}' is defined more than once")]
    DuplicateDriver(String),

    #[error("Driver name cannot be empty")]
    EmptyDriverName,

    #[error("Driver '{0}' declares no template roles")]
    NoRoles(String),

    #[error("Inline driver '{driver}' must have exactly one role named 'inline', found {found}")]
    InlineRoles { driver: String, found: String },

    #[error("Invalid markers: {0}")]
    InvalidMarkers(String),

    #[error("Driver '{0}' not found")]
    UnknownDriver(String),

    #[error("Driver '{0}' takes a template file argument")]
    MissingTemplateFile(String),

    #[error("Driver '{0}' embeds its template and takes no template file argument")]
    UnexpectedTemplateFile(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ConfigError {
    /// Whether the error comes from how the driver was invoked
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingTemplateFile(_) | ConfigError::UnexpectedTemplateFile(_)
        )
    }
}
