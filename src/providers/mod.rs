//! Provider module for Medchat
//!
//! This module contains the text-generation backend abstraction, the
//! Ollama implementation, and the process-wide model handle.

pub mod base;
pub mod handle;
pub mod ollama;

pub use base::{Generation, ModelInfo, Provider, TokenUsage};
pub use handle::{ModelHandle, ModelHandleProvider};
pub use ollama::OllamaProvider;

use crate::config::OllamaConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create a shareable Ollama handle from configuration
///
/// # Arguments
///
/// * `config` - Ollama host, model and sampling settings
/// * `system` - Optional system prompt sent with every generation
///
/// # Errors
///
/// Returns error if the HTTP client cannot be initialized
///
/// # Examples
///
/// ```
/// use medchat::config::OllamaConfig;
/// use medchat::providers::create_provider;
///
/// let handle = create_provider(OllamaConfig::default(), None).unwrap();
/// assert_eq!(handle.model_name(), "llama3");
/// ```
pub fn create_provider(config: OllamaConfig, system: Option<String>) -> Result<ModelHandle> {
    Ok(Arc::new(OllamaProvider::new(config, system)?))
}
