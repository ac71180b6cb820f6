//! Model management commands for Medchat
//!
//! This module lists the models installed on the Ollama server and shows
//! which one the chat is configured to use.

use crate::config::Config;
use crate::error::{MedchatError, Result};
use crate::providers::{self, ModelInfo};
use prettytable::{row, Table};

/// List models installed on the backend
///
/// # Arguments
///
/// * `config` - Configuration containing backend settings
/// * `json` - Print JSON instead of a table
///
/// # Returns
///
/// Returns Ok(()) on success, error if the backend is unavailable
///
/// # Examples
///
/// ```no_run
/// use medchat::config::Config;
/// use medchat::commands::models::list_models;
///
/// # async fn example() -> anyhow::Result<()> {
/// list_models(&Config::default(), false).await?;
/// # Ok(())
/// # }
/// ```
pub async fn list_models(config: &Config, json: bool) -> Result<()> {
    tracing::info!("Listing models from {}", config.ollama.host);

    let provider = providers::create_provider(config.ollama.clone(), None)?;
    let models = provider.list_models().await?;

    if json {
        output_models_json(&models)?;
    } else if models.is_empty() {
        println!("No models installed on {}", config.ollama.host);
    } else {
        output_models_table(&models, &config.ollama.model, &config.ollama.host);
    }

    Ok(())
}

/// Show the configured model
///
/// Does not contact the backend.
pub fn show_current_model(config: &Config) -> Result<()> {
    println!("{}", current_model_report(config));
    Ok(())
}

fn current_model_report(config: &Config) -> String {
    format!(
        "\nCurrent Model Information\n\nHost:           {}\nActive Model:   {}\nTemperature:    {}\n",
        config.ollama.host, config.ollama.model, config.ollama.temperature
    )
}

/// Output models in JSON format
///
/// # Errors
///
/// Returns `MedchatError::Serialization` if serialization fails
fn output_models_json(models: &[ModelInfo]) -> Result<()> {
    let json = serde_json::to_string_pretty(models).map_err(MedchatError::Serialization)?;
    println!("{}", json);
    Ok(())
}

/// Output models in table format, marking the configured one
fn output_models_table(models: &[ModelInfo], active: &str, host: &str) {
    println!("\nAvailable models on {}:\n", host);
    models_table(models, active).printstd();
    println!();
}

fn models_table(models: &[ModelInfo], active: &str) -> Table {
    let mut table = Table::new();
    table.add_row(row!["", "Model Name", "Family", "Parameters", "Size", "Modified"]);

    for model in models {
        let marker = if is_active(&model.name, active) { "*" } else { "" };
        table.add_row(row![
            marker,
            model.name,
            model.family.as_deref().unwrap_or("-"),
            model.parameter_size.as_deref().unwrap_or("-"),
            model.display_size(),
            model.modified_at.as_deref().unwrap_or("-")
        ]);
    }

    table
}

/// Ollama treats a bare name as the `latest` tag
fn is_active(name: &str, active: &str) -> bool {
    name == active || name.strip_suffix(":latest") == Some(active)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active_matches_latest_tag() {
        assert!(is_active("llama3", "llama3"));
        assert!(is_active("llama3:latest", "llama3"));
        assert!(!is_active("llama3:8b", "llama3"));
        assert!(!is_active("llama3", "llama3:8b"));
    }

    #[test]
    fn test_models_table_rows() {
        let mut tagged = ModelInfo::new("llama3:latest", 4 * 1024 * 1024 * 1024);
        tagged.family = Some("llama".to_string());
        let models = vec![tagged, ModelInfo::new("gemma2:2b", 1024)];

        let table = models_table(&models, "llama3");
        assert_eq!(table.len(), 3);

        let rendered = table.to_string();
        assert!(rendered.contains("llama3:latest"));
        assert!(rendered.contains("4.0GB"));
        assert!(rendered.contains("gemma2:2b"));
    }

    #[test]
    fn test_current_model_report() {
        let report = current_model_report(&Config::default());
        assert!(report.contains("llama3"));
        assert!(report.contains("http://localhost:11434"));
        assert!(report.contains("0.01"));
    }
}
