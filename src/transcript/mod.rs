pub mod store;

pub use store::{SESSION_END_MARKER, SESSION_START_MARKER, Session, Speaker, TranscriptStore};
