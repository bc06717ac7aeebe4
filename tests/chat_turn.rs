//! Controller-flow tests: one exchange = stream the reply, reassemble it,
//! then log the user entry and the assistant entry.

use async_trait::async_trait;
use futures_util::stream;
use parley::app::chat::{TurnParams, run_turn};
use parley::error::StreamError;
use parley::llm::streaming::{NullStreamSink, ProviderStream, StreamEvent};
use parley::llm::traits::Provider;
use parley::llm::types::{ChatMessage, MessageRole};
use parley::transcript::{SESSION_START_MARKER, Speaker, TranscriptStore};
use std::sync::Mutex;
use tempfile::tempdir;

/// Serves pre-scripted fragment streams and records every request's messages.
struct ScriptedProvider {
    replies: Mutex<Vec<Vec<Result<StreamEvent, StreamError>>>>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Vec<Result<StreamEvent, StreamError>>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        _model: &str,
        _temperature: f64,
    ) -> Result<ProviderStream, StreamError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        let next = self.replies.lock().unwrap().remove(0);
        Ok(Box::pin(stream::iter(next)))
    }
}

fn fragment_events(fragments: &[&str]) -> Vec<Result<StreamEvent, StreamError>> {
    let mut events = vec![Ok(StreamEvent::ResponseStart { model: None })];
    events.extend(fragments.iter().map(|fragment| {
        Ok(StreamEvent::TextDelta {
            text: (*fragment).to_string(),
        })
    }));
    events.push(Ok(StreamEvent::Done {
        input_tokens: None,
        output_tokens: None,
    }));
    events
}

#[tokio::test]
async fn a_turn_streams_reassembles_and_logs_both_sides() {
    let dir = tempdir().unwrap();
    let store = TranscriptStore::new(dir.path());
    let provider = ScriptedProvider::new(vec![fragment_events(&["Hel", "lo wor", "ld"])]);
    let user = Speaker::User("alice".into());
    let params = TurnParams {
        provider: &provider,
        store: &store,
        user: &user,
        model: "test-model",
        temperature: 0.7,
        sink: &NullStreamSink,
    };

    let mut active = None;
    let mut history = Vec::new();
    let reply = run_turn(&params, &mut active, &mut history, "hi")
        .await
        .unwrap();

    assert_eq!(reply, "Hel.lo wor.ld.");

    let content = store
        .display_history(active.as_ref())
        .await
        .unwrap()
        .unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(SESSION_START_MARKER));
    assert!(lines[1].ends_with("alice: hi"));
    assert!(lines[2].ends_with("assistant: Hel.lo wor.ld."));

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, MessageRole::User);
    assert_eq!(history[1].role, MessageRole::Assistant);
    assert_eq!(history[1].text, "Hel.lo wor.ld.");
}

#[tokio::test]
async fn second_turn_carries_the_accumulated_history() {
    let dir = tempdir().unwrap();
    let store = TranscriptStore::new(dir.path());
    let provider = ScriptedProvider::new(vec![
        fragment_events(&["One."]),
        fragment_events(&["Two."]),
    ]);
    let user = Speaker::User("user".into());
    let params = TurnParams {
        provider: &provider,
        store: &store,
        user: &user,
        model: "test-model",
        temperature: 0.7,
        sink: &NullStreamSink,
    };

    let mut active = None;
    let mut history = Vec::new();
    run_turn(&params, &mut active, &mut history, "first")
        .await
        .unwrap();
    run_turn(&params, &mut active, &mut history, "second")
        .await
        .unwrap();

    let seen = provider.seen.lock().unwrap();
    assert_eq!(
        seen[1],
        vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("One."),
            ChatMessage::user("second"),
        ]
    );
}

#[tokio::test]
async fn a_failed_stream_leaves_transcript_and_history_untouched() {
    let dir = tempdir().unwrap();
    let store = TranscriptStore::new(dir.path());
    let provider = ScriptedProvider::new(vec![
        fragment_events(&["Fine."]),
        vec![
            Ok(StreamEvent::TextDelta {
                text: "par".to_string(),
            }),
            Err(StreamError::Interrupted("connection reset".to_string())),
        ],
    ]);
    let user = Speaker::User("user".into());
    let params = TurnParams {
        provider: &provider,
        store: &store,
        user: &user,
        model: "test-model",
        temperature: 0.7,
        sink: &NullStreamSink,
    };

    let mut active = None;
    let mut history = Vec::new();
    run_turn(&params, &mut active, &mut history, "hello")
        .await
        .unwrap();
    let before = store
        .display_history(active.as_ref())
        .await
        .unwrap()
        .unwrap();

    let result = run_turn(&params, &mut active, &mut history, "again").await;
    assert!(result.is_err());

    // Prior turns stay logged; the failed one contributes nothing.
    let after = store
        .display_history(active.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before, after);
    assert_eq!(history.len(), 2);
}
