/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes these command modules:

- `chat`:   Interactive chat session
- `ask`:    Answer a single question and exit
- `models`: Inspect the models installed on the backend

The handlers are small: they wire configuration into the model handle,
the response chain and the interaction loop.
*/

use crate::chain::ResponseChain;
use crate::config::Config;
use crate::error::Result;
use crate::providers::{ModelHandle, ModelHandleProvider};
use std::sync::Arc;

// Special commands parser for interactive chat
pub mod special_commands;

// Model management commands
pub mod models;

/// Build the response chain from configuration
///
/// Gets the shared handle from `handles` and checks that the backend is
/// reachable. An unreachable backend is logged as a warning only; the
/// chain is still returned so the first request reports the real error.
///
/// # Errors
///
/// Returns error if the prompt template is invalid or the handle cannot
/// be constructed
pub async fn build_chain(config: &Config, handles: &ModelHandleProvider) -> Result<ResponseChain> {
    let template = config.prompt_template()?;
    let handle = handles.get_handle().await?;
    probe_backend(&handle).await;
    Ok(ResponseChain::new(template, handle))
}

async fn probe_backend(handle: &ModelHandle) {
    match handle.ping().await {
        Ok(()) => tracing::info!("Backend reachable, using model {}", handle.model_name()),
        Err(e) => tracing::warn!(
            "Backend not reachable ({}); requests for model {} will likely fail",
            e,
            handle.model_name()
        ),
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Builds the shared chain once and runs one interaction loop over a
    //! terminal display until the user exits.

    use super::*;
    use crate::display::TerminalDisplay;
    use crate::session::{InteractionLoop, Interrupt};

    /// Start interactive chat
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    ///
    /// # Examples
    ///
    /// ```
    /// use medchat::commands::chat;
    /// use medchat::config::Config;
    ///
    /// // In application code:
    /// // chat::run_chat(Config::default()).await?;
    /// ```
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat");

        let handles = ModelHandleProvider::from_config(&config);
        let chain = Arc::new(build_chain(&config, &handles).await?);

        let display = TerminalDisplay::new(&config.chat)?;
        display.print_welcome_banner(&config.chat.title, chain.handle().model_name());

        let interrupt = if config.chat.cancel_on_interrupt {
            Interrupt::CtrlC
        } else {
            Interrupt::Never
        };

        let mut chat = InteractionLoop::new(chain, display).with_interrupt(interrupt);
        chat.run().await
    }
}

// Single question handler
pub mod ask {
    //! One-shot question handler.
    //!
    //! Runs the same chain as interactive chat for a single question and
    //! prints the answer to stdout. No transcript is kept.

    use super::*;

    /// Answer one question and print the result
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `question` - Question text; may be empty
    ///
    /// # Errors
    ///
    /// Returns the backend error if generation fails
    pub async fn run_ask(config: Config, question: String) -> Result<()> {
        tracing::info!("Answering single question");

        let handles = ModelHandleProvider::from_config(&config);
        let chain = build_chain(&config, &handles).await?;
        let answer = chain.invoke(&question).await?;

        println!("{}", answer);
        Ok(())
    }
}
