//! Medchat - help-desk chatbot library for a local Ollama model
//!
//! This library provides the pieces behind the `medchat` CLI: a shared
//! model handle, a prompt template, the question-answering chain, and the
//! per-session interaction loop.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `providers`: Text-generation backend abstraction, Ollama client, shared handle
//! - `prompts`: Prompt template with a single `{question}` slot
//! - `chain`: Template, model and output parser composed into one call
//! - `transcript`: Append-only record of a session's turns
//! - `session`: Session state and the interaction loop
//! - `display`: Terminal front-end
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use medchat::providers::ModelHandleProvider;
//! use medchat::{Config, ResponseChain};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let handles = ModelHandleProvider::from_config(&config);
//!     let chain = ResponseChain::new(config.prompt_template()?, handles.get_handle().await?);
//!     println!("{}", chain.invoke("How do I connect to the ward printer?").await?);
//!     Ok(())
//! }
//! ```

pub mod chain;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod session;
pub mod transcript;

// Re-export commonly used types
pub use chain::ResponseChain;
pub use config::Config;
pub use error::{MedchatError, Result};
pub use session::{ChatSession, InteractionLoop};
pub use transcript::{Role, Transcript, Turn};
