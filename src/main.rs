//! Medchat - help-desk chatbot CLI
//!
#![doc = "Medchat - help-desk chatbot CLI"]
#![doc = "Main entry point for the medchat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use medchat::cli::{Cli, Commands, ModelCommand};
use medchat::commands;
use medchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { .. } => {
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Ask { question, .. } => {
            commands::ask::run_ask(config, question).await?;
            Ok(())
        }
        Commands::Models { command } => match command {
            ModelCommand::List { json } => {
                commands::models::list_models(&config, json).await?;
                Ok(())
            }
            ModelCommand::Current => {
                commands::models::show_current_model(&config)?;
                Ok(())
            }
        },
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins when set. Logs go to stderr so answers on stdout stay
/// clean.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "medchat=debug" } else { "medchat=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
