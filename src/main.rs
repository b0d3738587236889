use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use locator_engine::LocatorEngine;
use locator_forge::cli::{
    cmd_analyze, cmd_emit, cmd_script, cmd_version, AnalyzeArgs, EmitArgs, OutputFormat,
    ScriptArgs,
};
use locator_forge::{apply_env_overrides, load_config};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Locator Forge - ranked element locators and test code generation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug mode
    #[arg(short, long)]
    debug: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank locators and pick wait plans for every descriptor in a file
    Analyze(AnalyzeArgs),

    /// Emit automation code for every descriptor in a file
    Emit(EmitArgs),

    /// Assemble a complete test script from a plan file
    Script(ScriptArgs),

    /// Show build information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_logging(&cli.log_level, cli.debug)?;

    if let Commands::Version = cli.command {
        return cmd_version();
    }

    // Load configuration
    let mut config = load_config(cli.config.as_deref()).await?;
    apply_env_overrides(&mut config)?;
    let engine = LocatorEngine::new(config.engine).context("Invalid engine configuration")?;

    // Execute command
    let result = match cli.command {
        Commands::Analyze(args) => cmd_analyze(args, &engine, cli.output).await,
        Commands::Emit(args) => cmd_emit(args, &engine, cli.output).await,
        Commands::Script(args) => cmd_script(args, &engine).await,
        Commands::Version => cmd_version(),
    };

    match result {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}
