// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "barua")]
#[command(about = "Publish journey content to a CRM template store, with tracking and rollback")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output (final result only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// JSON-lines output for scripting
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new barua.yml configuration file
    Init {
        /// Journey id to scaffold
        #[arg(short, long)]
        journey: Option<String>,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Publish the journey's items to the template store
    Publish {
        /// Validate and track, but perform no network calls
        #[arg(long)]
        dry_run: bool,

        /// Skip validation entirely
        #[arg(long)]
        skip_validation: bool,

        /// Break a live journey lock held by another process
        #[arg(short, long)]
        force: bool,
    },

    /// Restore a deployment's items to their pre-publish content
    Rollback {
        /// Deployment id to roll back
        deployment_id: String,

        /// Break a live journey lock held by another process
        #[arg(short, long)]
        force: bool,
    },

    /// Show one deployment's record
    Status {
        /// Deployment id to inspect
        deployment_id: String,
    },

    /// List deployments for this journey, newest first
    List {
        /// List deployments for every journey
        #[arg(long)]
        all: bool,
    },
}
