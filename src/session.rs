//! Interactive session and its request/response loop
//!
//! A [`ChatSession`] holds one user's transcript. An [`InteractionLoop`]
//! ties a session to a shared [`ResponseChain`] and a [`ChatDisplay`]:
//! every submitted question is recorded, answered by the chain, and the
//! answer recorded in turn.

use crate::chain::ResponseChain;
use crate::commands::special_commands::{help_text, parse_special_command, SpecialCommand};
use crate::error::{MedchatError, Result};
use crate::transcript::{Transcript, Turn};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Notify;
use uuid::Uuid;

/// Whether a session is waiting for input or for the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Waiting for the next question
    #[default]
    Idle,
    /// A chain invocation is in flight
    Generating,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Generating => write!(f, "generating"),
        }
    }
}

/// Per-session context: identity, transcript and state
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: Uuid,
    transcript: Transcript,
    state: SessionState,
}

impl ChatSession {
    /// Start a new, empty session
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            transcript: Transcript::new(),
            state: SessionState::Idle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drop the transcript and continue under a fresh session id
    pub fn reset(&mut self) {
        tracing::info!(old_session = %self.id, "Resetting chat session");
        *self = Self::new();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Marks a session as generating for as long as it is alive
///
/// Dropping the guard, including when the owning future is abandoned,
/// returns the session to `Idle`.
struct GeneratingGuard<'a> {
    state: &'a mut SessionState,
}

impl<'a> GeneratingGuard<'a> {
    fn enter(state: &'a mut SessionState) -> Self {
        *state = SessionState::Generating;
        Self { state }
    }
}

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        *self.state = SessionState::Idle;
    }
}

/// The chat surface a session is shown on
///
/// Implementations decide how turns look; the loop only tells them what
/// to show and when.
pub trait ChatDisplay {
    /// Show the transcript after it changed
    ///
    /// Receives every turn in order each time; an implementation may skip
    /// turns it has already shown.
    fn render(&mut self, turns: &[Turn]);

    /// Show the full transcript on request, with timestamps
    fn show_history(&mut self, turns: &[Turn]) {
        self.render(turns);
    }

    /// Wait for the next submitted line
    ///
    /// Returns `Ok(None)` when input has ended.
    fn read_input(&mut self) -> Result<Option<String>>;

    /// Indicate that an answer is being generated
    fn show_busy(&mut self);

    /// Remove the indicator shown by `show_busy`
    fn hide_busy(&mut self);

    /// Report a failure to the user
    fn show_error(&mut self, error: &anyhow::Error);

    /// Show an informational message
    fn show_notice(&mut self, message: &str);
}

/// What may interrupt an in-flight generation
#[derive(Debug, Clone)]
pub enum Interrupt {
    /// Wait for the backend no matter what
    Never,
    /// Abandon the generation when the process receives Ctrl-C
    CtrlC,
    /// Abandon the generation when the notifier fires
    Signal(Arc<Notify>),
}

/// Drives one session: read, record, invoke, record, repeat
///
/// The chain (and with it the model handle) may be shared with other
/// loops; the session and display belong to this loop alone. Because
/// [`InteractionLoop::submit`] takes `&mut self`, a second question
/// cannot be submitted while one is still being answered.
pub struct InteractionLoop<D: ChatDisplay> {
    session: ChatSession,
    chain: Arc<ResponseChain>,
    display: D,
    interrupt: Interrupt,
}

impl<D: ChatDisplay> InteractionLoop<D> {
    /// Create a loop with a fresh session that never interrupts generation
    pub fn new(chain: Arc<ResponseChain>, display: D) -> Self {
        Self {
            session: ChatSession::new(),
            chain,
            display,
            interrupt: Interrupt::Never,
        }
    }

    /// Set what may interrupt an in-flight generation
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Submit one question and record the answer
    ///
    /// The question is recorded and rendered before the chain is invoked.
    /// On success the answer is recorded, rendered, and returned.
    ///
    /// # Errors
    ///
    /// Returns the chain's error, or `MedchatError::Cancelled` if the
    /// generation was interrupted. The question stays in the transcript
    /// without an answer in both cases.
    pub async fn submit(&mut self, question: impl Into<String>) -> Result<&Turn> {
        let question = question.into();
        tracing::info!(
            session = %self.session.id,
            turn = self.session.transcript.len(),
            "Question submitted"
        );

        self.session.transcript.append(Turn::user(question.clone()));
        self.display.render(self.session.transcript.all());

        let outcome = {
            let _generating = GeneratingGuard::enter(&mut self.session.state);
            self.display.show_busy();
            let outcome = invoke_interruptible(&self.chain, &self.interrupt, &question).await;
            self.display.hide_busy();
            outcome
        };

        let answer = match outcome {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(session = %self.session.id, "Generation failed: {}", e);
                return Err(e);
            }
        };

        self.session.transcript.append(Turn::assistant(answer));
        let turns = self.session.transcript.all();
        self.display.render(turns);
        Ok(&turns[turns.len() - 1])
    }

    /// Run until input ends or the user exits
    ///
    /// Failed generations are reported on the display and the loop keeps
    /// going. Only errors from reading input end the loop early.
    ///
    /// # Errors
    ///
    /// Returns error if the display fails to read input
    pub async fn run(&mut self) -> Result<()> {
        self.display.render(self.session.transcript.all());

        while let Some(line) = self.display.read_input()? {
            match parse_special_command(&line) {
                Ok(SpecialCommand::None) => {}
                Ok(SpecialCommand::Exit) => break,
                Ok(SpecialCommand::Help) => {
                    self.display.show_notice(help_text());
                    continue;
                }
                Ok(SpecialCommand::History) => {
                    self.display.show_history(self.session.transcript.all());
                    continue;
                }
                Ok(SpecialCommand::Clear) => {
                    self.session.reset();
                    self.display.render(self.session.transcript.all());
                    self.display
                        .show_notice(&format!("Started new session {}", self.session.id));
                    continue;
                }
                Ok(SpecialCommand::ShowStatus) => {
                    let status = self.status();
                    self.display.show_notice(&status);
                    continue;
                }
                Err(e) => {
                    self.display.show_error(&anyhow::Error::new(e));
                    continue;
                }
            }

            if let Err(e) = self.submit(line).await {
                self.display.show_error(&e);
            }
        }

        tracing::info!(
            session = %self.session.id,
            turns = self.session.transcript.len(),
            "Chat session ended"
        );
        Ok(())
    }

    /// Multi-line status summary for `/status`
    pub fn status(&self) -> String {
        let handle = self.chain.handle();
        format!(
            "Model:       {} (temperature {})\nSession:     {}\nTurns:       {}\nState:       {}",
            handle.model_name(),
            handle.temperature(),
            self.session.id,
            self.session.transcript.len(),
            self.session.state
        )
    }
}

async fn invoke_interruptible(
    chain: &ResponseChain,
    interrupt: &Interrupt,
    question: &str,
) -> Result<String> {
    match interrupt {
        Interrupt::Never => chain.invoke(question).await,
        Interrupt::CtrlC => {
            tokio::select! {
                result = chain.invoke(question) => result,
                _ = ctrl_c() => cancelled(),
            }
        }
        Interrupt::Signal(notify) => {
            tokio::select! {
                result = chain.invoke(question) => result,
                _ = notify.notified() => cancelled(),
            }
        }
    }
}

fn cancelled() -> Result<String> {
    tracing::info!("Generation interrupted by user");
    Err(MedchatError::Cancelled.into())
}

/// Resolves on Ctrl-C; never resolves if the signal cannot be watched
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
