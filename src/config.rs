//! Configuration management for Medchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{MedchatError, Result};
use crate::prompts::{PromptTemplate, DEFAULT_TEMPLATE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Medchat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Ollama backend settings
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Prompt template settings
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Interactive chat settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Sampling temperature; kept low for near-deterministic answers
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

fn default_temperature() -> f32 {
    0.01
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
            temperature: default_temperature(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Prompt configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Template text with a `{question}` slot
    #[serde(default = "default_template")]
    pub template: String,

    /// Optional system prompt sent alongside every generation
    #[serde(default)]
    pub system: Option<String>,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            system: None,
        }
    }
}

/// Chat mode configuration
///
/// Settings for the interactive terminal session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Title shown in the welcome banner
    #[serde(default = "default_title")]
    pub title: String,

    /// Input prompt shown before each question
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Message shown next to the spinner while waiting for the model
    #[serde(default = "default_busy_message")]
    pub busy_message: String,

    /// Abort an in-flight generation on Ctrl-C instead of waiting
    #[serde(default = "default_cancel_on_interrupt")]
    pub cancel_on_interrupt: bool,
}

fn default_title() -> String {
    "Medical record LLM".to_string()
}

fn default_placeholder() -> String {
    "Any questions? ".to_string()
}

fn default_busy_message() -> String {
    "Generating answer...".to_string()
}

fn default_cancel_on_interrupt() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            placeholder: default_placeholder(),
            busy_message: default_busy_message(),
            cancel_on_interrupt: default_cancel_on_interrupt(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MedchatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| MedchatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(host) = std::env::var("MEDCHAT_OLLAMA_HOST") {
            self.ollama.host = host;
        }

        if let Ok(model) = std::env::var("MEDCHAT_OLLAMA_MODEL") {
            self.ollama.model = model;
        }

        if let Ok(temperature) = std::env::var("MEDCHAT_TEMPERATURE") {
            if let Ok(value) = temperature.parse() {
                self.ollama.temperature = value;
            } else {
                tracing::warn!("Invalid MEDCHAT_TEMPERATURE: {}", temperature);
            }
        }

        if let Ok(timeout) = std::env::var("MEDCHAT_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.ollama.request_timeout_seconds = value;
            } else {
                tracing::warn!("Invalid MEDCHAT_TIMEOUT_SECONDS: {}", timeout);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(model) = cli.command.model_override() {
            tracing::debug!("Using model override from CLI: {}", model);
            self.ollama.model = model.to_string();
        }
    }

    /// Parse the configured prompt template
    ///
    /// # Errors
    ///
    /// Returns `MedchatError::Template` if the template is malformed
    pub fn prompt_template(&self) -> Result<PromptTemplate> {
        PromptTemplate::from_template(self.prompt.template.clone())
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.ollama.host.is_empty() {
            return Err(MedchatError::Config("ollama.host cannot be empty".to_string()).into());
        }

        if !self.ollama.host.starts_with("http://") && !self.ollama.host.starts_with("https://") {
            return Err(MedchatError::Config(format!(
                "ollama.host must start with http:// or https://, got: {}",
                self.ollama.host
            ))
            .into());
        }

        if self.ollama.model.trim().is_empty() {
            return Err(MedchatError::Config("ollama.model cannot be empty".to_string()).into());
        }

        if !(0.0..=2.0).contains(&self.ollama.temperature) {
            return Err(MedchatError::Config(
                "ollama.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.ollama.request_timeout_seconds == 0 {
            return Err(MedchatError::Config(
                "ollama.request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        self.prompt_template()
            .map_err(|e| MedchatError::Config(format!("prompt.template is invalid: {}", e)))?;

        Ok(())
    }
}
