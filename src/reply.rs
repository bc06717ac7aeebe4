//! Reassembly of streamed reply fragments into sentence-terminated text.
//!
//! The service may split its output anywhere, including mid-word. Every
//! fragment that does not already end in `.` has its trailing whitespace
//! replaced by a single `.` at the fragment boundary. Fragments ending in
//! other punctuation (`?`, `!`) therefore pick up a doubled terminator, and
//! an empty fragment contributes a lone `.`; both are kept so existing
//! transcripts and new ones read the same way.

use crate::error::StreamError;
use crate::llm::streaming::{ProviderStream, StreamEvent, StreamSink};
use futures_util::StreamExt;

/// Accumulator for one reply. Fed fragment-by-fragment in arrival order and
/// discarded once the fragment stream ends.
#[derive(Debug, Default)]
pub struct ReplyAssembler {
    text: String,
}

impl ReplyAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fragment, force-terminating it unless it already ends in a
    /// period. Strict concatenation: no separators are inserted; fragments
    /// are assumed to carry their own internal spacing.
    pub fn push_fragment(&mut self, fragment: &str) {
        if fragment.ends_with('.') {
            self.text.push_str(fragment);
        } else {
            self.text.push_str(fragment.trim_end());
            self.text.push('.');
        }
    }

    pub fn finish(self) -> String {
        self.text
    }
}

/// Drain a fragment stream to completion, echoing every event through `sink`
/// as it arrives, and return the assembled reply.
///
/// A failure in fragment production propagates unmodified: no retry, no
/// backoff, and fragments already echoed are not retracted.
pub async fn drain_reply(
    mut stream: ProviderStream,
    sink: &dyn StreamSink,
) -> Result<String, StreamError> {
    let mut assembler = ReplyAssembler::new();

    while let Some(event) = stream.next().await {
        let event = event?;
        sink.on_event(&event).await;
        if let StreamEvent::TextDelta { text } = &event {
            assembler.push_fragment(text);
        }
    }

    Ok(assembler.finish())
}
