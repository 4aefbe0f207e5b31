//! deepbrief CLI — the main entry point.
//!
//! Commands:
//! - `ask`     — Research a question and print the cited report
//! - `onboard` — Initialize the config file
//! - `doctor`  — Diagnose config and collaborator health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "deepbrief",
    about = "deepbrief — cited research reports from a single question",
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
    /// Research a question and print the final report
    Ask {
        /// The question to research
        question: String,

        /// Print per-stage progress detail
        #[arg(short, long)]
        debug: bool,
    },

    /// Initialize configuration
    Onboard,

    /// Diagnose config and collaborator health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Ask { question, debug } => commands::ask::run(&question, debug).await?,
        Commands::Onboard => commands::onboard::run()?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
