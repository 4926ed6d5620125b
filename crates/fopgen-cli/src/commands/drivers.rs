//! `fopgen drivers`: list configured drivers

use colored::Colorize;
use fopgen_codegen::OperationSelector;
use fopgen_config::DriverConfig;

use crate::GlobalOpts;

pub fn handle_drivers(opts: &GlobalOpts) -> anyhow::Result<()> {
    let (config, _) = opts.load_config()?;

    println!("{}", "Drivers:".bold().green());
    for driver in &config.drivers {
        println!("  {} {}", driver.name.cyan().bold(), describe(driver).dimmed());
        if !driver.description.is_empty() {
            println!("      {}", driver.description);
        }
    }
    Ok(())
}

/// One-line summary of a driver's template source, roles and selection
pub fn describe(driver: &DriverConfig) -> String {
    let source = if driver.is_inline() { "inline" } else { "file" };
    let roles = driver
        .bindings()
        .iter()
        .map(|b| format!("{}:{}", b.role, b.view))
        .collect::<Vec<_>>()
        .join(", ");
    let select = match &driver.select {
        OperationSelector::Exclude(names) if names.is_empty() => "all".to_string(),
        OperationSelector::Exclude(names) => format!("all except {}", join(names)),
        OperationSelector::Include(names) => format!("only {}", join(names)),
        OperationSelector::Journaled => "journaled".to_string(),
    };
    format!("[{}] roles: {}; ops: {}", source, roles, select)
}

fn join<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use crate::commands::drivers::*;
    use fopgen_config::Config;

    #[test]
    fn test_describe_builtin_drivers() {
        let config = Config::builtin().unwrap_or_default();

        let fdl = config.driver("fdl").map(describe).unwrap_or_default();
        assert_eq!(
            fdl,
            "[file] roles: fop:primary, cbk:callback, continue:primary; ops: journaled"
        );

        let jbr = config.driver("jbr-server").map(describe).unwrap_or_default();
        assert!(jbr.ends_with("ops: all except getspec, ipc"));

        let decl = config.driver("defaults-decl").map(describe).unwrap_or_default();
        assert!(decl.starts_with("[inline] roles: inline:primary"));
    }
}
