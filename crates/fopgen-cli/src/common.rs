//! Common types and utilities shared across commands

use anyhow::Context;
use clap::Parser;
use fopgen_config::{Config, ConfigSource};
use fopgen_registry::Registry;
use std::path::PathBuf;

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Decrease verbosity")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,

    #[arg(long, global = true, value_name = "PATH", help = "Config file to use")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Operation registry file (default: built-in table)"
    )]
    pub registry: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH", help = "Append log messages to a file")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Load the configuration the options point at
    pub fn load_config(&self) -> anyhow::Result<(Config, ConfigSource)> {
        Config::load(self.config.as_deref()).context("Failed to load configuration")
    }

    /// Load the registry, honouring `--registry` over the config file
    pub fn load_registry(&self, config: &Config) -> anyhow::Result<Registry> {
        config
            .load_registry(self.registry.as_deref())
            .context("Failed to load operation registry")
    }
}

#[cfg(test)]
mod tests {
    use crate::common::*;

    #[test]
    fn test_quiet_overrides_verbose() {
        let opts = GlobalOpts {
            quiet: true,
            verbose: 2,
            ..GlobalOpts::default()
        };
        assert_eq!(opts.verbosity_level(), 0);

        let opts = GlobalOpts {
            verbose: 2,
            ..GlobalOpts::default()
        };
        assert_eq!(opts.verbosity_level(), 2);
    }
}
