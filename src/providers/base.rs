//! Base provider trait and common types for Medchat
//!
//! This module defines the Provider trait that a text-generation backend
//! implements, along with the raw generation output and model metadata
//! types it returns.

use crate::error::{MedchatError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Token usage information reported by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: usize,
    /// Tokens produced for the answer
    pub completion_tokens: usize,
    /// Sum of prompt and completion tokens
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Creates a new token usage record
    ///
    /// # Examples
    ///
    /// ```
    /// use medchat::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Raw output of a single generation call
///
/// Carries the generated text plus whatever metadata the backend
/// reported. The response chain keeps only `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    /// Generated text, possibly empty
    pub text: String,
    /// Model that produced the text, as reported by the backend
    pub model: String,
    /// Whether the backend marked the generation complete
    pub done: bool,
    /// Backend-specific reason the generation stopped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done_reason: Option<String>,
    /// Token accounting, when the backend reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    /// Wall-clock time spent by the backend, in nanoseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration_ns: Option<u64>,
}

impl Generation {
    /// Creates a completed generation with no metadata
    ///
    /// # Examples
    ///
    /// ```
    /// use medchat::providers::Generation;
    ///
    /// let generation = Generation::text("llama3", "Hello");
    /// assert!(generation.done);
    /// assert!(generation.usage.is_none());
    /// ```
    pub fn text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
            done: true,
            done_reason: None,
            usage: None,
            total_duration_ns: None,
        }
    }
}

/// Metadata about a model installed on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier, e.g. `llama3:latest`
    pub name: String,
    /// Size on disk in bytes
    pub size_bytes: u64,
    /// Last modification time as reported by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    /// Model family, e.g. `llama`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Parameter count label, e.g. `8.0B`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_size: Option<String>,
}

impl ModelInfo {
    /// Creates model metadata with only a name and size
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            modified_at: None,
            family: None,
            parameter_size: None,
        }
    }

    /// Human-readable size, e.g. `4.3GB`
    ///
    /// # Examples
    ///
    /// ```
    /// use medchat::providers::ModelInfo;
    ///
    /// assert_eq!(ModelInfo::new("tiny", 2048).display_size(), "2.0KB");
    /// ```
    pub fn display_size(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// Format byte size for display
pub(crate) fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.1}{}", size, UNITS[unit_idx])
}

/// A text-generation backend
///
/// Implementations are configured once (model identifier, sampling
/// temperature) and are treated as immutable afterwards, so one instance
/// can be shared by every session in the process.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use medchat::error::Result;
/// use medchat::providers::{Generation, Provider};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Provider for Echo {
///     async fn generate(&self, prompt: &str) -> Result<Generation> {
///         Ok(Generation::text("echo", prompt))
///     }
///
///     fn model_name(&self) -> &str {
///         "echo"
///     }
///
///     fn temperature(&self) -> f32 {
///         0.0
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generates text for a fully rendered prompt
    ///
    /// # Errors
    ///
    /// Returns error if the backend is unreachable, answers with an error
    /// status, or sends a body that cannot be decoded.
    async fn generate(&self, prompt: &str) -> Result<Generation>;

    /// The model identifier this handle was configured with
    fn model_name(&self) -> &str;

    /// The sampling temperature this handle was configured with
    fn temperature(&self) -> f32;

    /// Lists models installed on the backend
    ///
    /// # Default Implementation
    ///
    /// Returns an error stating that listing is unsupported.
    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Err(MedchatError::Provider(
            "Model listing is not supported by this provider".to_string(),
        )
        .into())
    }

    /// Checks that the backend answers at all
    ///
    /// # Default Implementation
    ///
    /// Succeeds when [`Provider::list_models`] succeeds.
    async fn ping(&self) -> Result<()> {
        self.list_models().await.map(|_| ())
    }
}
