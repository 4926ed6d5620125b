//! `fopgen config`: inspect the resolved configuration

use clap::Subcommand;
use colored::Colorize;
use fopgen_config::Config;

use crate::logger;
use crate::GlobalOpts;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the resolved configuration, built-in drivers included
    Show,
    /// Print the path of the config file in use
    Path,
}

pub fn handle_config(action: &ConfigAction, opts: &GlobalOpts) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let (config, source) = opts.load_config()?;
            println!("{} {}", "# Configuration:".bold().green(), source);
            print!("{}", config.to_toml_string()?);
            logger::show_log_path();
        }
        ConfigAction::Path => {
            println!("{}", Config::resolve_source(opts.config.as_deref()));
        }
    }
    Ok(())
}
