use crate::error::StreamError;
use crate::llm::streaming::ProviderStream;
use crate::llm::types::ChatMessage;
use async_trait::async_trait;

/// A remote generative-language service.
///
/// The stream is pull-based and one-shot: the caller drains it to completion
/// (or to the first error) before doing anything else. Failures in fragment
/// production are not caught here; they surface as `StreamError` items.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: f64,
    ) -> Result<ProviderStream, StreamError>;
}
