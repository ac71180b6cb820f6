//! Ollama provider implementation for Medchat
//!
//! This module implements the Provider trait for Ollama, connecting to a local
//! or remote Ollama server to generate answers from single rendered prompts.
//! Includes model listing for the `models` command.

use crate::config::OllamaConfig;
use crate::error::{MedchatError, Result};
use crate::providers::{Generation, ModelInfo, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API provider
///
/// Configuration is fixed at construction: the model identifier, sampling
/// temperature, and optional system prompt never change afterwards.
///
/// # Examples
///
/// ```no_run
/// use medchat::config::OllamaConfig;
/// use medchat::providers::{OllamaProvider, Provider};
///
/// # async fn example() -> medchat::error::Result<()> {
/// let provider = OllamaProvider::new(OllamaConfig::default(), None)?;
/// let generation = provider.generate("Question: where is the scanner?\nAnswer:").await?;
/// println!("{}", generation.text);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
    system: Option<String>,
}

/// Response from Ollama's /api/tags endpoint
#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModelTag>,
}

/// Model metadata from /api/tags
#[derive(Debug, Deserialize)]
struct OllamaModelTag {
    name: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    modified_at: String,
    #[serde(default)]
    details: OllamaModelDetails,
}

/// Model details embedded in /api/tags entries
#[derive(Debug, Deserialize, Default)]
struct OllamaModelDetails {
    #[serde(default)]
    family: String,
    #[serde(default)]
    parameter_size: String,
}

/// Request body for /api/generate
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: OllamaOptions,
}

/// Sampling options for /api/generate
#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response body from /api/generate with `stream: false`
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
    #[serde(default)]
    total_duration: u64,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Ollama configuration containing host, model and temperature
    /// * `system` - Optional system prompt sent with every generation
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use medchat::config::OllamaConfig;
    /// use medchat::providers::OllamaProvider;
    ///
    /// let provider = OllamaProvider::new(OllamaConfig::default(), None);
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: OllamaConfig, system: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("medchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MedchatError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}, temperature={}",
            config.host,
            config.model,
            config.temperature
        );

        Ok(Self {
            client,
            config,
            system,
        })
    }

    /// Get the configured Ollama host
    ///
    /// # Examples
    ///
    /// ```
    /// use medchat::config::OllamaConfig;
    /// use medchat::providers::OllamaProvider;
    ///
    /// let provider = OllamaProvider::new(OllamaConfig::default(), None).unwrap();
    /// assert_eq!(provider.host(), "http://localhost:11434");
    /// ```
    pub fn host(&self) -> &str {
        &self.config.host
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.host.trim_end_matches('/'), path)
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> OllamaGenerateRequest<'a> {
        OllamaGenerateRequest {
            model: &self.config.model,
            prompt,
            system: self.system.as_deref(),
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        }
    }

    /// Convert the wire response into a `Generation`
    fn convert_response(response: OllamaGenerateResponse) -> Generation {
        let usage = if response.prompt_eval_count > 0 || response.eval_count > 0 {
            Some(TokenUsage::new(
                response.prompt_eval_count,
                response.eval_count,
            ))
        } else {
            None
        };

        Generation {
            text: response.response,
            model: response.model,
            done: response.done,
            done_reason: response.done_reason,
            usage,
            total_duration_ns: (response.total_duration > 0).then_some(response.total_duration),
        }
    }

    fn convert_tag(tag: OllamaModelTag) -> ModelInfo {
        let mut info = ModelInfo::new(tag.name, tag.size);
        info.modified_at = Some(tag.modified_at).filter(|s| !s.is_empty());
        info.family = Some(tag.details.family).filter(|s| !s.is_empty());
        info.parameter_size = Some(tag.details.parameter_size).filter(|s| !s.is_empty());
        info
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        let url = self.endpoint("/api/generate");
        let request = self.build_request(prompt);

        tracing::debug!(
            "Sending Ollama generate request: model={}, prompt_chars={}",
            request.model,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                MedchatError::Provider(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(MedchatError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: OllamaGenerateResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            MedchatError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            "Ollama response: done={}, prompt_tokens={}, completion_tokens={}",
            body.done,
            body.prompt_eval_count,
            body.eval_count
        );

        Ok(Self::convert_response(body))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn temperature(&self) -> f32 {
        self.config.temperature
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = self.endpoint("/api/tags");
        tracing::debug!("Fetching models from Ollama: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Failed to fetch Ollama models: {}", e);
            MedchatError::Provider(format!("Failed to connect to Ollama server: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(MedchatError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let tags: OllamaTagsResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama tags response: {}", e);
            MedchatError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        let models: Vec<ModelInfo> = tags.models.into_iter().map(Self::convert_tag).collect();
        tracing::debug!("Fetched {} models from Ollama", models.len());
        Ok(models)
    }
}
