// ABOUTME: Entry point for the barua CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use barua::config::{self, Config};
use barua::error::Result;
use barua::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);

    let result = run(cli, output).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { journey, force } => {
            config::init_config(&cwd, journey.as_deref(), force)?;
            output.success("Created barua.yml");
            Ok(())
        }
        Commands::Publish {
            dry_run,
            skip_validation,
            force,
        } => {
            let config = Config::discover(&cwd)?;
            commands::publish(config, dry_run, skip_validation, force, output).await
        }
        Commands::Rollback {
            deployment_id,
            force,
        } => {
            let config = Config::discover(&cwd)?;
            commands::rollback(config, &deployment_id, force, output).await
        }
        Commands::Status { deployment_id } => {
            let config = Config::discover(&cwd)?;
            commands::status(config, &deployment_id, output)
        }
        Commands::List { all } => {
            let config = Config::discover(&cwd)?;
            commands::list(config, all, output)
        }
    }
}
