//! Error types and exit codes for the fopgen CLI

use fopgen_config::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit status for any failed command
pub const EXIT_FAILURE: i32 = 1;
/// Exit status for a command invoked with the wrong arguments
pub const EXIT_USAGE: i32 = 2;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write to standard output: {0}")]
    Stdout(#[source] io::Error),
}

/// Exit status for an error returned by a command
pub fn exit_code(err: &anyhow::Error) -> i32 {
    let is_usage = err
        .chain()
        .any(|cause| cause.downcast_ref::<ConfigError>().is_some_and(ConfigError::is_usage));
    if is_usage {
        EXIT_USAGE
    } else {
        EXIT_FAILURE
    }
}
