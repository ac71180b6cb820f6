use async_trait::async_trait;
use medchat::error::{MedchatError, Result};
use medchat::providers::{Generation, Provider};
use medchat::session::ChatDisplay;
use medchat::transcript::Turn;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Provider that answers from a script and records every prompt
///
/// Each scripted entry is either an answer or an error message. Once the
/// script runs out, the prompt is echoed back.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockProvider {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answers(self, answer: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(Ok(answer.into()));
        self
    }

    pub fn fails(self, message: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(Err(message.into()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(answer)) => Ok(Generation::text("mock", answer)),
            Some(Err(message)) => Err(MedchatError::Provider(message).into()),
            None => Ok(Generation::text("mock", prompt)),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }

    fn temperature(&self) -> f32 {
        0.01
    }
}

/// Display event, in the order the loop produced it
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Render(usize),
    History(usize),
    Busy,
    Idle,
    Error(String),
    Notice(String),
}

/// Display fed from a fixed list of input lines
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedDisplay {
    inputs: VecDeque<String>,
    pub events: Vec<Event>,
}

#[allow(dead_code)]
impl ScriptedDisplay {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            events: Vec::new(),
        }
    }

    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ChatDisplay for ScriptedDisplay {
    fn render(&mut self, turns: &[Turn]) {
        self.events.push(Event::Render(turns.len()));
    }

    fn show_history(&mut self, turns: &[Turn]) {
        self.events.push(Event::History(turns.len()));
    }

    fn read_input(&mut self) -> Result<Option<String>> {
        Ok(self.inputs.pop_front())
    }

    fn show_busy(&mut self) {
        self.events.push(Event::Busy);
    }

    fn hide_busy(&mut self) {
        self.events.push(Event::Idle);
    }

    fn show_error(&mut self, error: &anyhow::Error) {
        self.events.push(Event::Error(error.to_string()));
    }

    fn show_notice(&mut self, message: &str) {
        self.events.push(Event::Notice(message.to_string()));
    }
}
