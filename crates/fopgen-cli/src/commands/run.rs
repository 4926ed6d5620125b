//! `fopgen run`: generate one target file

use anyhow::Context;
use clap::Args;
use fopgen_codegen::{Generator, TemplateStore};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::CliError;
use crate::logger;
use crate::output::{write_atomic, write_stdout};
use crate::GlobalOpts;

#[derive(Args, Debug, Clone)]
pub struct RunCommand {
    /// Driver to run (see `fopgen drivers`)
    #[arg(value_name = "DRIVER")]
    pub driver: String,

    /// Template file (file drivers only), then the target source file
    #[arg(value_name = "FILES", num_args = 1..=2, required = true)]
    pub files: Vec<PathBuf>,

    /// Write to this file instead of standard output
    #[arg(short = 'o', long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

impl RunCommand {
    /// Split the positional files into (template file, target file)
    pub fn template_and_target(&self) -> (Option<&Path>, Option<&Path>) {
        match self.files.as_slice() {
            [target] => (None, Some(target.as_path())),
            [template, target] => (Some(template.as_path()), Some(target.as_path())),
            _ => (None, None),
        }
    }
}

pub fn handle_run(cmd: &RunCommand, opts: &GlobalOpts) -> anyhow::Result<()> {
    logger::set_current_driver(Some(cmd.driver.clone()));
    let result = run_driver(cmd, opts);
    logger::set_current_driver(None);
    result
}

fn run_driver(cmd: &RunCommand, opts: &GlobalOpts) -> anyhow::Result<()> {
    let (template_file, Some(target)) = cmd.template_and_target() else {
        anyhow::bail!("A target source file is required");
    };

    let (config, source) = opts.load_config()?;
    logger::debug(&format!("Using configuration from {}", source));
    let driver = config.driver(&cmd.driver)?;
    let registry = opts.load_registry(&config)?;

    let store = TemplateStore::new()?;
    let templates = driver
        .templates(&store, template_file)
        .with_context(|| format!("Driver '{}'", driver.name))?;
    logger::step(&format!(
        "Loaded {} template(s): {}",
        templates.len(),
        templates.roles().collect::<Vec<_>>().join(", ")
    ));

    let generator = Generator::new(
        &registry,
        &templates,
        &driver.bindings(),
        driver.filter(&config.reserved()),
        config.markers(),
    )
    .with_context(|| format!("Driver '{}'", driver.name))?;

    let file = File::open(target).map_err(|source| CliError::Input {
        path: target.to_path_buf(),
        source,
    })?;
    let (generated, report) = generator
        .generate_to_vec(BufReader::new(file))
        .with_context(|| format!("Generation failed for {}", target.display()))?;

    debug!("Generated {} bytes for {:?}", generated.len(), target);
    if report.triggers == 0 {
        logger::info(&format!(
            "No '{}' line in {}, copied unchanged",
            generator.markers().trigger,
            target.display()
        ));
    }

    match &cmd.output {
        Some(path) => write_atomic(path, &generated)?,
        None => write_stdout(&generated)?,
    }

    logger::success(&format!(
        "Generated {} ({} trigger line(s))",
        target.display(),
        report.triggers
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::run::*;

    fn command(files: &[&str]) -> RunCommand {
        RunCommand {
            driver: "fdl".to_string(),
            files: files.iter().map(PathBuf::from).collect(),
            output: None,
        }
    }

    #[test]
    fn test_template_and_target() {
        assert_eq!(
            command(&["fdl.c"]).template_and_target(),
            (None, Some(Path::new("fdl.c")))
        );
        assert_eq!(
            command(&["tmpl.c", "fdl.c"]).template_and_target(),
            (Some(Path::new("tmpl.c")), Some(Path::new("fdl.c")))
        );
    }
}
