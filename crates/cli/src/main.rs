//! IntentGate CLI, the main entry point.
//!
//! Commands:
//! - `gateway`   Start the HTTP command gateway
//! - `classify`  Classify a single prompt and print the action
//! - `onboard`   Write a default config file
//! - `doctor`    Diagnose configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "intentgate",
    about = "IntentGate: natural-language commands to structured actions",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.intentgate/config.toml)
    #[arg(short, long, global = true, env = "INTENTGATE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,

        /// Ignore any API key and classify with the rule table only
        #[arg(long)]
        rules_only: bool,
    },

    /// Classify one prompt and print the resulting action as JSON
    Classify {
        /// The natural-language command
        prompt: String,

        /// Also print which rule matched and why
        #[arg(short, long)]
        explain: bool,

        /// Ignore any API key and classify with the rule table only
        #[arg(long)]
        rules_only: bool,
    },

    /// Write a default configuration file
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
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config_path = cli
        .config
        .unwrap_or_else(intentgate_config::AppConfig::config_path);

    match cli.command {
        Commands::Gateway { port, rules_only } => {
            commands::gateway::run(&config_path, port, rules_only).await?
        }
        Commands::Classify {
            prompt,
            explain,
            rules_only,
        } => commands::classify::run(&config_path, &prompt, explain, rules_only).await?,
        Commands::Onboard => commands::onboard::run(&config_path).await?,
        Commands::Doctor => commands::doctor::run(&config_path).await?,
    }

    Ok(())
}
