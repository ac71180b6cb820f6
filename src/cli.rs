//! Command-line interface definition for Medchat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, and
//! model discovery.

use clap::{Parser, Subcommand};

/// Medchat - help-desk chat for a locally hosted language model
///
/// Forwards questions to an Ollama server through a fixed prompt
/// template and prints the answers.
#[derive(Parser, Debug, Clone)]
#[command(name = "medchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Medchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Override the model from config
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Ask a single question and print the answer
    Ask {
        /// The question to send
        question: String,

        /// Override the model from config
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Inspect models on the Ollama server
    Models {
        /// Model subcommand
        #[command(subcommand)]
        command: ModelCommand,
    },
}

/// Model subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ModelCommand {
    /// List models installed on the server
    List {
        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the configured model and host
    Current,
}

impl Commands {
    /// The `--model` value given to this command, if any
    pub fn model_override(&self) -> Option<&str> {
        match self {
            Self::Chat { model } | Self::Ask { model, .. } => model.as_deref(),
            Self::Models { .. } => None,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
