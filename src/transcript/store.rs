use crate::error::StorageError;
use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// First line of every transcript file.
pub const SESSION_START_MARKER: &str = "--- New Session ---";
/// Appended when a session is logically closed (`restart` or `exit`).
pub const SESSION_END_MARKER: &str = "--- Session Ended ---";

// Filenames sort lexicographically in creation order.
const FILE_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const ENTRY_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Who a transcript line is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Speaker {
    System,
    /// The user's configured display name.
    User(String),
    Assistant,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("system"),
            Self::User(name) => f.write_str(name),
            Self::Assistant => f.write_str("assistant"),
        }
    }
}

/// Handle to one open session, backed by exactly one transcript file for its
/// lifetime. Owned by the caller (the chat loop), not by the store; there is
/// no hidden current-session state.
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
}

impl Session {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Durable, append-only record of a conversation, with replay.
///
/// Every write opens the file for append and closes it again; no handle is
/// buffered across calls. Replay always re-reads from disk, so it reflects
/// exactly what was durably written.
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create a new transcript file named after the current timestamp and
    /// write the session-start entry. Same-second collisions get a `_2`,
    /// `_3`, … suffix; `_` sorts after `.`, so creation order is preserved.
    pub async fn start_session(&self) -> Result<Session, StorageError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StorageError::CreateDir {
                dir: self.dir.clone(),
                source,
            })?;

        let stamp = Local::now().format(FILE_STAMP_FORMAT).to_string();
        let mut path = self.dir.join(format!("{stamp}.txt"));
        let mut n = 2u32;
        while path.exists() {
            path = self.dir.join(format!("{stamp}_{n}.txt"));
            n += 1;
        }

        let session = Session { path };
        self.write_entry(&session, &Speaker::System, SESSION_START_MARKER)
            .await?;
        tracing::debug!(path = %session.path.display(), "started transcript session");
        Ok(session)
    }

    /// Append one entry to the active session, starting a session first if
    /// none is active (deliberate convenience, not an error path).
    pub async fn append_message(
        &self,
        active: &mut Option<Session>,
        speaker: &Speaker,
        text: &str,
    ) -> Result<(), StorageError> {
        let session = match active.take() {
            Some(session) => session,
            None => self.start_session().await?,
        };
        let result = self.write_entry(&session, speaker, text).await;
        *active = Some(session);
        result
    }

    /// Full current transcript, verbatim, re-read from disk. `None` when no
    /// session has been started.
    pub async fn display_history(
        &self,
        active: Option<&Session>,
    ) -> Result<Option<String>, StorageError> {
        match active {
            Some(session) => fs::read_to_string(&session.path)
                .await
                .map(Some)
                .map_err(|source| StorageError::Read {
                    path: session.path.clone(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Append the session-end entry and drop the handle. The file is kept;
    /// lazily opens a session first if none is active, matching
    /// [`Self::append_message`].
    pub async fn end_session(&self, active: &mut Option<Session>) -> Result<(), StorageError> {
        self.append_message(active, &Speaker::System, SESSION_END_MARKER)
            .await?;
        active.take();
        Ok(())
    }

    async fn write_entry(
        &self,
        session: &Session,
        speaker: &Speaker,
        text: &str,
    ) -> Result<(), StorageError> {
        let stamp = Local::now().format(ENTRY_STAMP_FORMAT);
        let line = format!("{stamp} {speaker}: {text}\n");

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&session.path)
            .await
            .map_err(|source| StorageError::Open {
                path: session.path.clone(),
                source,
            })?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|source| StorageError::Write {
                path: session.path.clone(),
                source,
            })?;
        file.flush().await.map_err(|source| StorageError::Write {
            path: session.path.clone(),
            source,
        })
    }
}
