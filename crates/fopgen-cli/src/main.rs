use clap::{Parser, Subcommand};
use fopgen::{
    commands::{
        config::{self, ConfigAction},
        drivers,
        ops::{self, OpsCommand},
        run::{self, RunCommand},
        templates::{self, TemplatesCommand},
    },
    errors::exit_code,
    init_tracing, logger, GlobalOpts,
};

#[derive(Parser)]
#[command(name = "fopgen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "File operation boilerplate generator",
    long_about = "fopgen renders per-operation templates for every file operation in a registry and splices the result into a translator source file in place of its trigger line."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a target file with a driver
    Run(RunCommand),
    /// List configured drivers
    Drivers,
    /// List registry operations
    Ops(OpsCommand),
    /// List the roles and placeholders in a template file
    Templates(TemplatesCommand),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let verbosity = cli.global.verbosity_level();

    let log_file = cli.global.log_file.clone().or_else(|| {
        fopgen_config::Config::load(cli.global.config.as_deref())
            .ok()
            .and_then(|(config, _)| config.log_file)
    });
    if let Err(e) = logger::init_with_verbosity(verbosity, log_file) {
        logger::warn(&format!("Failed to initialize logger: {}", e));
    }
    init_tracing();

    let result = match &cli.command {
        Commands::Run(cmd) => run::handle_run(cmd, &cli.global),
        Commands::Drivers => drivers::handle_drivers(&cli.global),
        Commands::Ops(cmd) => ops::handle_ops(cmd, &cli.global),
        Commands::Templates(cmd) => templates::handle_templates(cmd, &cli.global),
        Commands::Config { action } => config::handle_config(action, &cli.global),
    };

    if let Err(e) = result {
        logger::error(&format!("{:#}", e));
        std::process::exit(exit_code(&e));
    }
}
