use super::*;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

enum Step {
    Reply(&'static str),
    Fail(ChatFailure),
    Hang,
}

/// Plays back a fixed script of outcomes and counts calls.
struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(&self, _message: &str) -> Result<String, ChatFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(text)) => Ok(text.to_string()),
            Some(Step::Fail(failure)) => Err(failure),
            Some(Step::Hang) => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            }
            None => panic!("transport called more times than scripted"),
        }
    }
}

fn upstream(status: u16) -> Step {
    Step::Fail(ChatFailure::Upstream {
        status,
        detail: None,
    })
}

fn controller(
    transport: &Arc<ScriptedTransport>,
) -> FailoverChatController<Arc<ScriptedTransport>> {
    FailoverChatController::new(
        Arc::clone(transport),
        FailoverPolicy {
            threshold: 2,
            timeout: Duration::from_millis(50),
        },
    )
}

#[tokio::test]
async fn test_success_passes_upstream_text_through() {
    let transport = ScriptedTransport::new(vec![Step::Reply("<b>Buy low</b>")]);
    let mut chat = controller(&transport);

    let reply = chat.send("hello").await;
    assert_eq!(reply, ChatReply::new("<b>Buy low</b>", ReplyKind::Upstream));
    assert_eq!(chat.mode(), ChatMode::Live);
    assert_eq!(chat.failure_count(), 0);
}

#[tokio::test]
async fn test_two_consecutive_failures_switch_to_demo() {
    let transport = ScriptedTransport::new(vec![upstream(500), upstream(500)]);
    let mut chat = controller(&transport);

    let first = chat.send("stocks please").await;
    assert_eq!(first, ChatReply::new(GENERIC_FAILURE, ReplyKind::Failure));
    assert_eq!(chat.mode(), ChatMode::Live);
    assert_eq!(chat.failure_count(), 1);

    let second = chat.send("I want to trade Bitcoin today").await;
    assert_eq!(second.kind, ReplyKind::SwitchedToDemo);
    assert_eq!(
        second.text,
        format!(
            "{SWITCH_NOTICE}\n\n{}",
            demo_response("I want to trade Bitcoin today")
        )
    );
    assert!(second.text.contains("Crypto Core-Satellite Strategy"));
    assert_eq!(chat.mode(), ChatMode::Demo);
}

#[tokio::test]
async fn test_success_between_failures_resets_counter() {
    let transport = ScriptedTransport::new(vec![
        upstream(500),
        Step::Reply("fine"),
        upstream(500),
        upstream(500),
    ]);
    let mut chat = controller(&transport);

    assert_eq!(chat.send("a").await.kind, ReplyKind::Failure);
    assert_eq!(chat.send("b").await.kind, ReplyKind::Upstream);
    assert_eq!(chat.failure_count(), 0);
    assert_eq!(chat.send("c").await.kind, ReplyKind::Failure);
    assert_eq!(chat.mode(), ChatMode::Live);
    assert_eq!(chat.send("d").await.kind, ReplyKind::SwitchedToDemo);
    assert_eq!(chat.mode(), ChatMode::Demo);
}

#[tokio::test]
async fn test_demo_mode_never_calls_transport() {
    let transport = ScriptedTransport::new(vec![upstream(503), upstream(503)]);
    let mut chat = controller(&transport);
    chat.send("x").await;
    chat.send("y").await;
    assert_eq!(transport.calls(), 2);

    for message in ["ETF ideas", "forex", "what now?"] {
        let reply = chat.send(message).await;
        assert_eq!(reply, ChatReply::new(demo_response(message), ReplyKind::Demo));
    }
    assert_eq!(transport.calls(), 2);
    assert_eq!(chat.mode(), ChatMode::Demo);
}

#[tokio::test]
async fn test_failure_detail_is_shown_before_threshold() {
    let transport = ScriptedTransport::new(vec![Step::Fail(ChatFailure::Upstream {
        status: 500,
        detail: Some("API quota exceeded. Please try again later.".into()),
    })]);
    let mut chat = controller(&transport);

    let reply = chat.send("hello").await;
    assert_eq!(reply.text, "API quota exceeded. Please try again later.");
    assert_eq!(reply.kind, ReplyKind::Failure);
}

#[tokio::test]
async fn test_timeout_counts_as_failure_with_timeout_text() {
    let transport = ScriptedTransport::new(vec![Step::Hang]);
    let mut chat = controller(&transport);

    let reply = chat.send("hello").await;
    assert_eq!(reply, ChatReply::new(TIMEOUT_FAILURE, ReplyKind::Failure));
    assert_eq!(chat.failure_count(), 1);
}

#[tokio::test]
async fn test_transport_and_malformed_failures_use_generic_text() {
    let transport = ScriptedTransport::new(vec![
        Step::Fail(ChatFailure::Transport("connection refused".into())),
        Step::Reply("ok"),
        Step::Fail(ChatFailure::Malformed("missing `response` field".into())),
    ]);
    let mut chat = controller(&transport);

    assert_eq!(chat.send("a").await.text, GENERIC_FAILURE);
    chat.send("b").await;
    assert_eq!(chat.send("c").await.text, GENERIC_FAILURE);
    assert_eq!(chat.mode(), ChatMode::Live);
}

#[tokio::test]
async fn test_threshold_one_switches_on_first_failure() {
    let transport = ScriptedTransport::new(vec![Step::Hang]);
    let mut chat = FailoverChatController::new(
        Arc::clone(&transport),
        FailoverPolicy {
            threshold: 1,
            timeout: Duration::from_millis(20),
        },
    );

    let reply = chat.send("equity").await;
    assert_eq!(reply.kind, ReplyKind::SwitchedToDemo);
    assert!(reply.text.starts_with(SWITCH_NOTICE));
}

#[test]
fn test_policy_from_settings() {
    let settings = ChatSettings {
        endpoint: "http://127.0.0.1:3000/api/gemini".into(),
        timeout_secs: 5,
        failure_threshold: 3,
    };
    let policy = FailoverPolicy::from_settings(&settings).unwrap();
    assert_eq!(policy.threshold, 3);
    assert_eq!(policy.timeout, Duration::from_secs(5));
    assert_eq!(FailoverPolicy::default().threshold, 2);
    assert_eq!(FailoverPolicy::default().timeout, Duration::from_secs(15));
}

#[test]
fn test_policy_rejects_zero_timeout_and_threshold() {
    let zero_wait = ChatSettings {
        endpoint: "http://127.0.0.1:3000/api/gemini".into(),
        timeout_secs: 0,
        failure_threshold: 2,
    };
    let err = FailoverPolicy::from_settings(&zero_wait).unwrap_err();
    assert!(matches!(err, AppError::ConfigError(ref msg) if msg.contains("timeout_secs")));

    let zero_threshold = ChatSettings {
        timeout_secs: 15,
        failure_threshold: 0,
        ..zero_wait
    };
    let err = FailoverPolicy::from_settings(&zero_threshold).unwrap_err();
    assert!(matches!(err, AppError::ConfigError(ref msg) if msg.contains("failure_threshold")));
}
