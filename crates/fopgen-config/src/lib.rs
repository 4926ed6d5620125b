//! Driver definitions and configuration loading for fopgen

#![deny(clippy::print_stdout)]

pub mod config;
pub mod driver;
pub mod errors;

pub use config::{Config, ConfigSource, CONFIG_ENV, CONFIG_FILE_NAME};
pub use driver::DriverConfig;
pub use errors::ConfigError;
