//! StepForge CLI - Main Entry Point
//!
//! Generates Cucumber step-definition modules from feature analysis
//! documents and inspects how each step is resolved.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use stepforge_cli::commands::{generate, inspect, verify, Context};
use stepforge_cli::config::{CliConfig, DEFAULT_CONFIG_FILE};
use stepforge_cli::output::{self, print_error};

/// StepForge - Cucumber step-definition synthesis
#[derive(Parser)]
#[command(name = "stepforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(long, env = "STEPFORGE_CONFIG", default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the step-definition module for one analysis document
    Generate(generate::GenerateArgs),

    /// Generate modules for every analysis document in a directory
    GenerateAll(generate::GenerateAllArgs),

    /// Show how every unique step is resolved
    Inspect(inspect::InspectArgs),

    /// List the built-in patterns in evaluation order
    Patterns,

    /// Check that an existing module matches freshly generated output
    Verify(verify::VerifyArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries generated modules
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::load(&cli.config)?;
    let ctx = Context::new(config, cli.format);

    let result = match cli.command {
        Commands::Generate(args) => generate::execute(args, &ctx),
        Commands::GenerateAll(args) => generate::execute_all(args, &ctx),
        Commands::Inspect(args) => inspect::execute(args, &ctx),
        Commands::Patterns => inspect::execute_patterns(&ctx),
        Commands::Verify(args) => match verify::execute(args, &ctx) {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(1),
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
