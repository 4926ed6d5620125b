//! `fopgen ops`: list registry operations

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use fopgen_registry::{Operation, View};

use crate::GlobalOpts;

#[derive(Args, Debug, Clone)]
pub struct OpsCommand {
    /// Only list the operations this driver generates for
    #[arg(value_name = "DRIVER")]
    pub driver: Option<String>,

    /// Print operations with their substitution maps as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn handle_ops(cmd: &OpsCommand, opts: &GlobalOpts) -> anyhow::Result<()> {
    let (config, _) = opts.load_config()?;
    let registry = opts.load_registry(&config)?;

    let operations: Vec<&Operation> = match &cmd.driver {
        Some(name) => {
            let driver = config.driver(name)?;
            driver
                .filter(&config.reserved())
                .select(&registry)
                .with_context(|| format!("Driver '{}'", name))?
        }
        None => registry.iter().collect(),
    };

    if cmd.json {
        let json = serde_json::to_string_pretty(&operations)
            .context("Failed to serialize operations")?;
        println!("{}", json);
        return Ok(());
    }

    for op in &operations {
        println!("{}", format_operation(op));
    }
    Ok(())
}

fn format_operation(op: &Operation) -> String {
    let mut line = format!("{:<14}", op.name).cyan().to_string();
    if let Some(journal) = op.journal {
        line.push_str(&format!(" {}", journal.to_string().yellow()));
    }
    if op.view(View::Callback).is_none() {
        line.push_str(&format!(" {}", "(no callback)".dimmed()));
    }
    line
}
