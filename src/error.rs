use std::path::PathBuf;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for Parley.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum ParleyError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Transcript storage ──────────────────────────────────────────────
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    // ── Reply stream ────────────────────────────────────────────────────
    #[error("stream: {0}")]
    Stream(#[from] StreamError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Transcript storage errors ──────────────────────────────────────────────
//
// Storage failures are terminal for the calling operation: nothing here is
// retried, and no partial-write recovery is attempted. Callers decide how to
// report them.

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create transcript directory {}: {source}", dir.display())]
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to open transcript {} for append: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to append to transcript {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read transcript {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ─── Reply stream errors ────────────────────────────────────────────────────
//
// Raised when the fragment source fails before yielding a complete reply,
// whether the request never got off the ground or the stream died mid-reply.

#[derive(Debug, Error)]
pub enum StreamError {
    #[error(
        "Gemini API key not found. Set GEMINI_API_KEY (or GOOGLE_API_KEY), \
         or add api_key to the config file"
    )]
    MissingApiKey,

    #[error("request to {provider} failed: {message}")]
    Request { provider: String, message: String },

    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("reply stream interrupted: {0}")]
    Interrupted(String),
}

impl StreamError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            provider: "gemini".to_string(),
            message: message.into(),
        }
    }
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, ParleyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = ParleyError::Config(ConfigError::Validation("bad temperature".into()));
        assert!(err.to_string().contains("validation failed"));
    }

    #[test]
    fn storage_error_carries_path() {
        let err = ParleyError::Storage(StorageError::Open {
            path: PathBuf::from("/tmp/chat/2024-01-01_00-00-00.txt"),
            source: std::io::Error::other("denied"),
        });
        assert!(err.to_string().contains("2024-01-01_00-00-00.txt"));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn stream_api_error_displays_status() {
        let err = ParleyError::Stream(StreamError::Api {
            provider: "gemini".into(),
            status: 429,
            message: "quota exceeded".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn missing_api_key_mentions_env_var() {
        let err = StreamError::MissingApiKey;
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let parley_err: ParleyError = anyhow_err.into();
        assert!(parley_err.to_string().contains("something went wrong"));
    }
}
