//! Error types for Medchat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Medchat operations
///
/// Covers configuration loading, prompt template parsing, backend
/// invocation, and the terminal front-end.
#[derive(Error, Debug)]
pub enum MedchatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Prompt template parsing errors
    #[error("Template error: {0}")]
    Template(String),

    /// Backend errors (unreachable server, error status, malformed body)
    #[error("Provider error: {0}")]
    Provider(String),

    /// A generation was abandoned before the backend answered
    #[error("Generation cancelled")]
    Cancelled,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Line editor errors
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Result type alias for Medchat operations
///
/// Uses `anyhow::Error` so callers can attach context while propagating
/// with `?`. Concrete failures are `MedchatError` values underneath.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = MedchatError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_template_error_display() {
        let error = MedchatError::Template("unclosed '{'".to_string());
        assert_eq!(error.to_string(), "Template error: unclosed '{'");
    }

    #[test]
    fn test_provider_error_display() {
        let error = MedchatError::Provider("connection refused".to_string());
        assert_eq!(error.to_string(), "Provider error: connection refused");
    }

    #[test]
    fn test_cancelled_display() {
        assert_eq!(MedchatError::Cancelled.to_string(), "Generation cancelled");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: MedchatError = io_error.into();
        assert!(matches!(error, MedchatError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: MedchatError = json_error.into();
        assert!(matches!(error, MedchatError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: MedchatError = yaml_error.into();
        assert!(matches!(error, MedchatError::Yaml(_)));
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let err: anyhow::Error = MedchatError::Cancelled.into();
        assert!(matches!(
            err.downcast_ref::<MedchatError>(),
            Some(MedchatError::Cancelled)
        ));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MedchatError>();
    }
}
