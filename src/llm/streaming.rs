use crate::error::StreamError;
use async_trait::async_trait;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;

/// Lazy, finite, one-shot sequence of reply events for a single remote call.
pub type ProviderStream =
    Pin<Box<dyn Stream<Item = Result<StreamEvent, StreamError>> + Send + 'static>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StreamEvent {
    ResponseStart {
        model: Option<String>,
    },
    /// One partial-text fragment. The service may split anywhere, including
    /// mid-word.
    TextDelta {
        text: String,
    },
    Done {
        input_tokens: Option<u64>,
        output_tokens: Option<u64>,
    },
}

/// Observer for events as they arrive, ahead of reassembly.
#[async_trait]
pub trait StreamSink: Send + Sync {
    async fn on_event(&self, event: &StreamEvent);
}

#[derive(Debug, Default)]
pub struct NullStreamSink;

#[async_trait]
impl StreamSink for NullStreamSink {
    async fn on_event(&self, _event: &StreamEvent) {}
}

/// Echoes each fragment to the terminal the moment it arrives, one line per
/// fragment, so the user watches the reply being generated.
pub struct CliStreamSink {
    writer: Arc<dyn Fn(&str) + Send + Sync>,
}

impl CliStreamSink {
    pub fn new() -> Self {
        Self {
            writer: Arc::new(|text| {
                println!("{text}");
            }),
        }
    }

    #[cfg(test)]
    fn with_writer(writer: Arc<dyn Fn(&str) + Send + Sync>) -> Self {
        Self { writer }
    }
}

impl Default for CliStreamSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StreamSink for CliStreamSink {
    async fn on_event(&self, event: &StreamEvent) {
        if let StreamEvent::TextDelta { text } = event {
            (self.writer)(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CliStreamSink, NullStreamSink, StreamEvent, StreamSink};
    use std::sync::{Arc, Mutex};

    #[test]
    fn stream_event_text_delta_debug() {
        let event = StreamEvent::TextDelta {
            text: "hello".to_string(),
        };
        let debug = format!("{event:?}");
        assert!(debug.contains("TextDelta"));
        assert!(debug.contains("hello"));
    }

    #[tokio::test]
    async fn null_stream_sink_is_noop() {
        let sink = NullStreamSink;
        sink.on_event(&StreamEvent::ResponseStart { model: None })
            .await;
        sink.on_event(&StreamEvent::TextDelta { text: "x".into() })
            .await;
        sink.on_event(&StreamEvent::Done {
            input_tokens: None,
            output_tokens: None,
        })
        .await;
    }

    #[tokio::test]
    async fn cli_stream_sink_writes_text_delta() {
        let captured = Arc::new(Mutex::new(String::new()));
        let captured_clone = Arc::clone(&captured);
        let sink = CliStreamSink::with_writer(Arc::new(move |text| {
            let mut guard = captured_clone
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            guard.push_str(text);
        }));

        sink.on_event(&StreamEvent::TextDelta {
            text: "hello".to_string(),
        })
        .await;

        let output = captured
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        assert_eq!(output, "hello");
    }

    #[tokio::test]
    async fn cli_stream_sink_ignores_non_text_events() {
        let captured = Arc::new(Mutex::new(String::new()));
        let captured_clone = Arc::clone(&captured);
        let sink = CliStreamSink::with_writer(Arc::new(move |text| {
            let mut guard = captured_clone
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            guard.push_str(text);
        }));

        sink.on_event(&StreamEvent::ResponseStart { model: None })
            .await;
        sink.on_event(&StreamEvent::Done {
            input_tokens: None,
            output_tokens: None,
        })
        .await;

        let output = captured
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        assert!(output.is_empty());
    }
}
