//! DevDuo CLI — the main entry point.
//!
//! Commands:
//! - `collaborate` — Run a writer/reviewer session on a coding task
//! - `models`      — List chat models available to your API key
//! - `onboard`     — Write a default config file
//! - `doctor`      — Diagnose configuration

use std::path::PathBuf;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "devduo",
    about = "DevDuo — AI pair programming with a writer and a reviewer",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Let the writer and reviewer collaborate on a task
    Collaborate {
        /// Task description (skips the example menu)
        #[arg(short, long)]
        task: Option<String>,

        /// Maximum writer/reviewer iterations (at least 1)
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
        iterations: Option<u32>,

        /// Model to use (skips model selection)
        #[arg(short, long)]
        model: Option<String>,

        /// Where to save the result
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save without asking
        #[arg(long, conflicts_with = "no_save")]
        save: bool,

        /// Never save, don't ask
        #[arg(long)]
        no_save: bool,

        /// Don't print turns as they are produced
        #[arg(short, long)]
        quiet: bool,
    },

    /// List available chat models
    Models,

    /// Initialize configuration
    Onboard,

    /// Diagnose configuration
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Collaborate {
            task,
            iterations,
            model,
            output,
            save,
            no_save,
            quiet,
        } => {
            let save = match (save, no_save) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let args = commands::collaborate::CollaborateArgs {
                task,
                iterations,
                model,
                output,
                save,
                quiet,
            };
            commands::collaborate::run(args).await?
        }
        Commands::Models => commands::models::run().await?,
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
