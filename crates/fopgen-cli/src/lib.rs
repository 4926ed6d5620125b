//! fopgen library: command handlers exposed for the binary and for testing

pub mod commands;
pub mod common;
pub mod errors;
pub mod output;

pub use common::GlobalOpts;
pub use fopgen_logger as logger;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "FOPGEN_LOG";

/// Install the `tracing` subscriber; diagnostics go to stderr
///
/// Without `FOPGEN_LOG` or `RUST_LOG` the level follows the logger's
/// verbosity, so call this after `logger::init_with_verbosity`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| {
            let level = logger::verbosity_to_filter();
            EnvFilter::new(format!(
                "warn,fopgen={level},fopgen_codegen={level},fopgen_config={level},fopgen_registry={level}"
            ))
        });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
