//! `fopgen templates`: inspect a template file

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use fopgen_codegen::{missing_placeholders, TemplateSet, TemplateStore};
use fopgen_config::Config;
use fopgen_registry::Registry;
use std::path::PathBuf;

use crate::logger;
use crate::GlobalOpts;

#[derive(Args, Debug, Clone)]
pub struct TemplatesCommand {
    /// Template file to parse
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Check the file against a driver's roles and selected operations
    #[arg(long, value_name = "DRIVER")]
    pub check: Option<String>,
}

pub fn handle_templates(cmd: &TemplatesCommand, opts: &GlobalOpts) -> anyhow::Result<()> {
    let store = TemplateStore::new()?;
    let templates = store
        .load(&cmd.file)
        .with_context(|| format!("Invalid template file {}", cmd.file.display()))?;

    for template in templates.iter() {
        println!(
            "{} {}",
            template.role().cyan().bold(),
            template.placeholders().join(" ").dimmed()
        );
    }

    let Some(driver_name) = &cmd.check else {
        return Ok(());
    };
    let (config, _) = opts.load_config()?;
    let registry = opts.load_registry(&config)?;
    let problems = check_templates(&config, &registry, driver_name, &templates)?;

    if problems.is_empty() {
        logger::success(&format!("Templates match driver '{}'", driver_name));
        return Ok(());
    }
    for problem in &problems {
        logger::error(problem);
    }
    anyhow::bail!(
        "{} problem(s) found checking {} against driver '{}'",
        problems.len(),
        cmd.file.display(),
        driver_name
    )
}

/// Everything that would make `run` fail for these templates
pub fn check_templates(
    config: &Config,
    registry: &Registry,
    driver_name: &str,
    templates: &TemplateSet,
) -> anyhow::Result<Vec<String>> {
    let driver = config.driver(driver_name)?;
    let operations = driver.filter(&config.reserved()).select(registry)?;
    let mut problems = Vec::new();

    for binding in driver.bindings() {
        let Some(template) = templates.get(&binding.role) else {
            problems.push(format!("missing template role '{}'", binding.role));
            continue;
        };
        for op in &operations {
            let Some(subs) = op.view(binding.view) else {
                problems.push(format!(
                    "'{}' has no callback signature for role '{}'",
                    op.name, binding.role
                ));
                continue;
            };
            let missing = missing_placeholders(template, subs);
            if !missing.is_empty() {
                problems.push(format!(
                    "role '{}' uses {} with no value for '{}'",
                    binding.role,
                    missing
                        .iter()
                        .map(|token| format!("@{}@", token))
                        .collect::<Vec<_>>()
                        .join(", "),
                    op.name
                ));
            }
        }
    }
    Ok(problems)
}
