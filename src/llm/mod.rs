pub mod gemini;
pub mod sse;
pub mod streaming;
pub mod traits;
pub mod types;

pub use gemini::GeminiProvider;
pub use streaming::{CliStreamSink, NullStreamSink, ProviderStream, StreamEvent, StreamSink};
pub use traits::Provider;
pub use types::{ChatMessage, MessageRole};
