//! Terminal front-end for interactive chat
//!
//! Reads questions with rustyline, shows a spinner while an answer is
//! generated, and prints answers and errors with colored role tags.

use crate::config::ChatConfig;
use crate::error::{MedchatError, Result};
use crate::session::ChatDisplay;
use crate::transcript::{Role, Turn};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::time::Duration;

/// Chat surface backed by stdin/stdout
pub struct TerminalDisplay {
    editor: DefaultEditor,
    placeholder: String,
    busy_message: String,
    spinner: Option<ProgressBar>,
    shown: usize,
}

impl TerminalDisplay {
    /// Create a terminal display using the chat settings
    ///
    /// # Errors
    ///
    /// Returns `MedchatError::Readline` if the line editor cannot be set up
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let editor = DefaultEditor::new().map_err(MedchatError::from)?;
        Ok(Self {
            editor,
            placeholder: config.placeholder.clone(),
            busy_message: config.busy_message.clone(),
            spinner: None,
            shown: 0,
        })
    }

    /// Print the banner shown when a chat starts
    pub fn print_welcome_banner(&self, title: &str, model: &str) {
        let rule = "═".repeat(62);
        println!("\n{}", rule);
        println!("  {}", title.bold());
        println!("{}\n", rule);
        println!("Model: {}", model.cyan());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }
}

fn role_tag(role: Role) -> colored::ColoredString {
    match role {
        Role::User => "[you]".blue().bold(),
        Role::Assistant => "[assistant]".green().bold(),
    }
}

/// Blank lines are skipped; anything else is passed on exactly as typed
fn submitted_line(line: String) -> Option<String> {
    if line.trim().is_empty() {
        None
    } else {
        Some(line)
    }
}

impl ChatDisplay for TerminalDisplay {
    fn render(&mut self, turns: &[Turn]) {
        if turns.len() < self.shown {
            self.shown = 0;
        }

        // User turns were echoed by the line editor as they were typed
        for turn in &turns[self.shown..] {
            if turn.role() == Role::Assistant {
                println!("\n{} {}\n", role_tag(turn.role()), turn.content());
            }
        }
        self.shown = turns.len();
    }

    fn show_history(&mut self, turns: &[Turn]) {
        if turns.is_empty() {
            println!("{}", "No messages in this session yet.".dimmed());
            return;
        }

        println!();
        for turn in turns {
            let stamp = turn.created_at().with_timezone(&chrono::Local);
            println!(
                "{} {} {}",
                stamp.format("%H:%M:%S").to_string().dimmed(),
                role_tag(turn.role()),
                turn.content()
            );
        }
        println!();
    }

    fn read_input(&mut self) -> Result<Option<String>> {
        loop {
            match self.editor.readline(&self.placeholder) {
                Ok(line) => {
                    let Some(line) = submitted_line(line) else {
                        continue;
                    };
                    self.editor
                        .add_history_entry(line.as_str())
                        .map_err(MedchatError::from)?;
                    return Ok(Some(line));
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    return Ok(None);
                }
                Err(e) => {
                    tracing::error!("Readline error: {:?}", e);
                    return Err(MedchatError::from(e).into());
                }
            }
        }
    }

    fn show_busy(&mut self) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(self.busy_message.clone());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn hide_busy(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn show_error(&mut self, error: &anyhow::Error) {
        eprintln!("{}\n", format!("Error: {}", error).red());
    }

    fn show_notice(&mut self, message: &str) {
        println!("{}", message);
    }
}
