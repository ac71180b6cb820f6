//! Integration tests for the interaction loop
//!
//! Drives full sessions through a scripted display and a scripted
//! provider, checking transcript growth, failure handling, prompt
//! isolation and handle sharing.

mod common;

use common::{Event, MockProvider, ScriptedDisplay};
use medchat::chain::ResponseChain;
use medchat::prompts::PromptTemplate;
use medchat::providers::{ModelHandle, ModelHandleProvider};
use medchat::session::{InteractionLoop, SessionState};
use medchat::transcript::Role;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn chain_over(provider: Arc<MockProvider>) -> Arc<ResponseChain> {
    let template = PromptTemplate::from_template("Question: {question}\nAnswer:").unwrap();
    Arc::new(ResponseChain::new(template, provider))
}

#[tokio::test]
async fn test_successful_submissions_double_the_transcript() {
    let provider = Arc::new(MockProvider::new());
    let mut chat = InteractionLoop::new(chain_over(provider), ScriptedDisplay::default());

    for n in 1..=5 {
        chat.submit(format!("question {}", n)).await.unwrap();
        assert_eq!(chat.session().transcript().len(), 2 * n);
    }

    let roles: Vec<Role> = chat
        .session()
        .transcript()
        .all()
        .iter()
        .map(|t| t.role())
        .collect();
    for pair in roles.chunks(2) {
        assert_eq!(pair, [Role::User, Role::Assistant]);
    }
}

#[tokio::test]
async fn test_failure_leaves_unanswered_question() {
    let provider = Arc::new(
        MockProvider::new()
            .answers("a1")
            .answers("a2")
            .fails("connection refused"),
    );
    let mut chat = InteractionLoop::new(chain_over(provider), ScriptedDisplay::default());

    chat.submit("q1").await.unwrap();
    chat.submit("q2").await.unwrap();
    let err = chat.submit("q3").await.unwrap_err();

    assert!(err.to_string().contains("connection refused"));
    let transcript = chat.session().transcript();
    assert_eq!(transcript.len(), 2 * (3 - 1) + 1);
    assert_eq!(transcript.last().unwrap().role(), Role::User);
    assert_eq!(transcript.last().unwrap().content(), "q3");
    assert_eq!(chat.session().state(), SessionState::Idle);
}

#[tokio::test]
async fn test_session_recovers_after_failure() {
    let provider = Arc::new(MockProvider::new().fails("timeout").answers("fine now"));
    let display = ScriptedDisplay::new(&["first", "second"]);
    let mut chat = InteractionLoop::new(chain_over(provider), display);

    chat.run().await.unwrap();

    let contents: Vec<&str> = chat
        .session()
        .transcript()
        .all()
        .iter()
        .map(|t| t.content())
        .collect();
    assert_eq!(contents, vec!["first", "second", "fine now"]);
    assert_eq!(chat.display().errors().len(), 1);
    assert!(chat.display().errors()[0].contains("timeout"));
}

#[tokio::test]
async fn test_prompt_contains_only_current_question() {
    let provider = Arc::new(MockProvider::new());
    let display = ScriptedDisplay::new(&["printer offline", "vpn drops", "scanner jams"]);
    let mut chat = InteractionLoop::new(chain_over(Arc::clone(&provider)), display);

    chat.run().await.unwrap();

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 3);
    assert_eq!(prompts[2], "Question: scanner jams\nAnswer:");
    assert!(!prompts[2].contains("printer"));
    assert!(!prompts[2].contains("vpn"));
}

#[tokio::test]
async fn test_empty_question_is_sent() {
    let provider = Arc::new(MockProvider::new().answers("How can I help?"));
    let mut chat = InteractionLoop::new(chain_over(Arc::clone(&provider)), ScriptedDisplay::default());

    let answer = chat.submit("").await.unwrap();
    assert_eq!(answer.content(), "How can I help?");
    assert_eq!(provider.prompts(), vec!["Question: \nAnswer:".to_string()]);
}

#[tokio::test]
async fn test_display_sees_question_before_generation() {
    let provider = Arc::new(MockProvider::new().answers("a1").fails("boom"));
    let display = ScriptedDisplay::new(&["q1", "q2"]);
    let mut chat = InteractionLoop::new(chain_over(provider), display);

    chat.run().await.unwrap();

    assert_eq!(
        chat.display().events,
        vec![
            Event::Render(0),
            Event::Render(1),
            Event::Busy,
            Event::Idle,
            Event::Render(2),
            Event::Render(3),
            Event::Busy,
            Event::Idle,
            Event::Error("Provider error: boom".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_sessions_share_one_handle() {
    let constructed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&constructed);
    let handles = ModelHandleProvider::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockProvider::new()) as ModelHandle)
    });

    let template = PromptTemplate::default();
    let first = Arc::new(ResponseChain::new(
        template.clone(),
        handles.get_handle().await.unwrap(),
    ));
    let second = Arc::new(ResponseChain::new(
        template,
        handles.get_handle().await.unwrap(),
    ));
    assert!(Arc::ptr_eq(first.handle(), second.handle()));

    let mut alice = InteractionLoop::new(Arc::clone(&first), ScriptedDisplay::default());
    let mut bob = InteractionLoop::new(Arc::clone(&second), ScriptedDisplay::default());
    alice.submit("a").await.unwrap();
    alice.submit("b").await.unwrap();
    bob.submit("c").await.unwrap();

    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    assert_eq!(alice.session().transcript().len(), 4);
    assert_eq!(bob.session().transcript().len(), 2);
    assert_ne!(alice.session().id(), bob.session().id());
}

#[tokio::test]
async fn test_history_and_status_do_not_touch_transcript() {
    let provider = Arc::new(MockProvider::new());
    let display = ScriptedDisplay::new(&["q1", "/history", "/status", "/HELP", "quit", "never"]);
    let mut chat = InteractionLoop::new(chain_over(Arc::clone(&provider)), display);

    chat.run().await.unwrap();

    assert_eq!(chat.session().transcript().len(), 2);
    assert_eq!(provider.prompts().len(), 1);
    assert!(chat.display().events.contains(&Event::History(2)));
    assert!(chat.display().errors().is_empty());
}

#[tokio::test]
async fn test_question_text_reaches_prompt_unchanged() {
    let provider = Arc::new(MockProvider::new());
    let display = ScriptedDisplay::new(&["  indented question \t", "/etc/hosts won't save, what now?"]);
    let mut chat = InteractionLoop::new(chain_over(Arc::clone(&provider)), display);

    chat.run().await.unwrap();

    assert_eq!(
        provider.prompts(),
        vec![
            "Question:   indented question \t\nAnswer:".to_string(),
            "Question: /etc/hosts won't save, what now?\nAnswer:".to_string(),
        ]
    );
    assert_eq!(chat.session().transcript().all()[0].content(), "  indented question \t");
    assert!(chat.display().errors().is_empty());
}

#[tokio::test]
async fn test_interrupt_keeps_unanswered_question() {
    use medchat::error::MedchatError;
    use medchat::session::Interrupt;
    use tokio::sync::Notify;

    struct Stalled;

    #[async_trait::async_trait]
    impl medchat::providers::Provider for Stalled {
        async fn generate(&self, _prompt: &str) -> medchat::Result<medchat::providers::Generation> {
            std::future::pending().await
        }

        fn model_name(&self) -> &str {
            "stalled"
        }

        fn temperature(&self) -> f32 {
            0.01
        }
    }

    let notify = Arc::new(Notify::new());
    let chain = Arc::new(ResponseChain::new(PromptTemplate::default(), Arc::new(Stalled)));
    let mut chat = InteractionLoop::new(chain, ScriptedDisplay::default())
        .with_interrupt(Interrupt::Signal(Arc::clone(&notify)));

    let trigger = Arc::clone(&notify);
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        trigger.notify_one();
    });

    let err = chat.submit("printer offline").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MedchatError>(),
        Some(MedchatError::Cancelled)
    ));
    assert_eq!(chat.session().transcript().len(), 1);
    assert_eq!(chat.session().state(), SessionState::Idle);
    assert_eq!(
        chat.display().events,
        vec![Event::Render(1), Event::Busy, Event::Idle]
    );
}
