//! Transcript persistence for chat services.
//!
//! [`FilesystemTranscriptStore`] implements [`pchat::TranscriptStore`] by
//! rewriting one pretty-printed JSON file after every turn.
//!
//! ```rust
//! use pmemory::{load_transcript, save_transcript};
//! use pprovider::Message;
//!
//! let dir = std::env::temp_dir().join("pmemory-doc");
//! let path = dir.join("doc_chat_history.json");
//! save_transcript(&path, &[Message::system("be brief")]).expect("save");
//!
//! let messages = load_transcript(&path).expect("load");
//! assert_eq!(messages, vec![Message::system("be brief")]);
//! # std::fs::remove_dir_all(&dir).ok();
//! ```

mod document;
mod error;
mod filesystem;

pub mod prelude {
    pub use crate::{
        FilesystemTranscriptStore, MemoryError, MemoryErrorKind, load_transcript,
        save_transcript, transcript_file_name,
    };
}

pub use error::{MemoryError, MemoryErrorKind};
pub use filesystem::{
    FilesystemTranscriptStore, load_transcript, save_transcript, transcript_file_name,
};
