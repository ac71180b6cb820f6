//! Question-answering chain
//!
//! Three fixed steps: render the prompt template with the question, call
//! the model handle, and reduce the raw generation to plain text. Backend
//! errors are returned as-is; nothing here retries or substitutes a
//! fallback answer.

use crate::error::Result;
use crate::prompts::PromptTemplate;
use crate::providers::{Generation, ModelHandle};

/// Reduces a raw generation to the text shown to the user
pub trait OutputParser: Send + Sync {
    fn parse(&self, generation: Generation) -> String;
}

/// Keeps the generated text unchanged and drops all metadata
///
/// An empty generation parses to an empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrOutputParser;

impl OutputParser for StrOutputParser {
    fn parse(&self, generation: Generation) -> String {
        generation.text
    }
}

/// Template, model handle and parser composed into one call
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use medchat::chain::ResponseChain;
/// use medchat::prompts::PromptTemplate;
/// use medchat::providers::{Generation, Provider};
/// use std::sync::Arc;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Provider for Echo {
///     async fn generate(&self, prompt: &str) -> medchat::error::Result<Generation> {
///         Ok(Generation::text("echo", prompt))
///     }
///     fn model_name(&self) -> &str { "echo" }
///     fn temperature(&self) -> f32 { 0.0 }
/// }
///
/// # async fn example() -> medchat::error::Result<()> {
/// let template = PromptTemplate::from_template("Q: {question}")?;
/// let chain = ResponseChain::new(template, Arc::new(Echo));
/// assert_eq!(chain.invoke("hi").await?, "Q: hi");
/// # Ok(())
/// # }
/// ```
pub struct ResponseChain {
    template: PromptTemplate,
    handle: ModelHandle,
    parser: Box<dyn OutputParser>,
}

impl ResponseChain {
    /// Build a chain with the plain-string output parser
    pub fn new(template: PromptTemplate, handle: ModelHandle) -> Self {
        Self::with_parser(template, handle, StrOutputParser)
    }

    /// Build a chain with a custom output parser
    pub fn with_parser(
        template: PromptTemplate,
        handle: ModelHandle,
        parser: impl OutputParser + 'static,
    ) -> Self {
        Self {
            template,
            handle,
            parser: Box::new(parser),
        }
    }

    /// Render the prompt that `invoke` would send for `question`
    pub fn render(&self, question: &str) -> String {
        self.template.render(question)
    }

    /// The model handle this chain calls
    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    /// Run the chain for one question
    ///
    /// Only `question` reaches the model; earlier turns of a session are
    /// never included.
    ///
    /// # Errors
    ///
    /// Returns the backend error unchanged if generation fails
    pub async fn invoke(&self, question: &str) -> Result<String> {
        let prompt = self.render(question);
        tracing::debug!(
            "Invoking chain: model={}, prompt_chars={}",
            self.handle.model_name(),
            prompt.chars().count()
        );

        let generation = self.handle.generate(&prompt).await?;
        if let Some(usage) = generation.usage {
            tracing::debug!(
                "Generation used {} prompt + {} completion tokens",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        Ok(self.parser.parse(generation))
    }
}

impl std::fmt::Debug for ResponseChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseChain")
            .field("template", &self.template.source())
            .field("model", &self.handle.model_name())
            .finish()
    }
}
