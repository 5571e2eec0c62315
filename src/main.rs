//! Swarmchat - terminal chat client for a multi-agent research assistant
//!
#![doc = "Main entry point for the Swarmchat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use swarmchat::cli::{Cli, Commands};
use swarmchat::commands;
use swarmchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat => {
            tracing::info!("Starting interactive chat mode");
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Ask { prompt, attach } => {
            tracing::info!("Sending one-shot prompt");
            commands::ask::run_ask(config, prompt, attach).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("swarmchat=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
