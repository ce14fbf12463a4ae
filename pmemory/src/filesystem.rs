//! Timestamp-named JSON transcript files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use pchat::{ChatError, ChatFuture, TranscriptStore};
use pcommon::SessionId;
use pprovider::Message;

use crate::MemoryError;
use crate::document::{decode, encode};

/// Name used for a transcript started at `started_at`, e.g.
/// `openai_chat_history_2025-03-14_09-26-53.json`.
pub fn transcript_file_name(prefix: &str, started_at: DateTime<Local>) -> String {
    format!(
        "{prefix}_chat_history_{}.json",
        started_at.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Writes the whole transcript to one file, replacing it on every save.
///
/// The file name is fixed when the store is created, so one store holds one
/// conversation's history for the lifetime of the process.
#[derive(Debug)]
pub struct FilesystemTranscriptStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FilesystemTranscriptStore {
    /// Creates `dir` if needed and names the file after the current local time.
    pub fn new(dir: impl AsRef<Path>, prefix: &str) -> Result<Self, MemoryError> {
        Self::with_file_name(dir, transcript_file_name(prefix, Local::now()))
    }

    pub fn with_file_name(
        dir: impl AsRef<Path>,
        file_name: impl AsRef<str>,
    ) -> Result<Self, MemoryError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|error| {
            MemoryError::storage(format!(
                "failed to create transcript directory {}: {error}",
                dir.display()
            ))
        })?;

        Ok(Self {
            path: dir.join(file_name.as_ref()),
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, messages: &[Message]) -> Result<(), MemoryError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| MemoryError::storage("transcript store lock poisoned"))?;

        save_transcript(&self.path, messages)
    }

    fn read(&self) -> Result<Option<Vec<Message>>, MemoryError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| MemoryError::storage("transcript store lock poisoned"))?;

        if !self.path.exists() {
            return Ok(None);
        }

        load_transcript(&self.path).map(Some)
    }
}

impl TranscriptStore for FilesystemTranscriptStore {
    fn save<'a>(
        &'a self,
        session_id: &'a SessionId,
        messages: &'a [Message],
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            self.write(messages)?;
            tracing::debug!(
                session_id = %session_id,
                path = %self.path.display(),
                messages = messages.len(),
                "transcript saved"
            );
            Ok(())
        })
    }

    fn load<'a>(
        &'a self,
        _session_id: &'a SessionId,
    ) -> ChatFuture<'a, Result<Option<Vec<Message>>, ChatError>> {
        Box::pin(async move { Ok(self.read()?) })
    }
}

/// Reads a transcript file written by [`save_transcript`] or the store.
pub fn load_transcript(path: impl AsRef<Path>) -> Result<Vec<Message>, MemoryError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|error| {
        if error.kind() == std::io::ErrorKind::NotFound {
            MemoryError::not_found(format!("no transcript at {}", path.display()))
        } else {
            MemoryError::storage(format!("failed to read transcript file: {error}"))
        }
    })?;

    decode(&bytes)
}

pub fn save_transcript(path: impl AsRef<Path>, messages: &[Message]) -> Result<(), MemoryError> {
    write_atomic(path.as_ref(), &encode(messages)?)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), MemoryError> {
    let Some(parent) = path.parent() else {
        return Err(MemoryError::invalid_request(
            "transcript path has no parent directory",
        ));
    };
    fs::create_dir_all(parent).map_err(|error| {
        MemoryError::storage(format!("failed to create parent directory: {error}"))
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).map_err(|error| {
        MemoryError::storage(format!("failed to write temporary transcript file: {error}"))
    })?;

    fs::rename(&tmp, path).map_err(|error| {
        MemoryError::storage(format!("failed to finalize transcript file: {error}"))
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn file_name_embeds_the_start_time() {
        let started_at = Local
            .with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
            .single()
            .expect("unambiguous local time");

        assert_eq!(
            transcript_file_name("m5stack", started_at),
            "m5stack_chat_history_2025-03-14_09-26-53.json"
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");

        let error = load_transcript(dir.path().join("absent.json")).expect_err("missing file");

        assert_eq!(error.kind, crate::MemoryErrorKind::NotFound);
    }

    #[test]
    fn save_leaves_no_temporary_file_behind() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("history.json");

        save_transcript(&path, &[Message::system("seed")]).expect("save");

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }
}
