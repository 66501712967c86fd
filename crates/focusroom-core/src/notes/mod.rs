//! Session notes.
//!
//! Free-text notes captured during a focus session, tagged with the number
//! of focus cycles completed when they were written. The whole log lives
//! under one key as a JSON array and is rewritten on every save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, StorageError, ValidationError};
use crate::storage::KvStore;

/// Storage key for the note log.
pub const NOTES_KEY: &str = "session_notes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionNote {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub cycle: u64,
}

/// Append-only note log over a key-value store.
pub struct SessionNoteStore<S: KvStore> {
    kv: S,
}

impl<S: KvStore> SessionNoteStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Every stored note, oldest first. A missing key is an empty log.
    ///
    /// # Errors
    /// Returns `StorageError` if the store cannot be read or the stored log
    /// cannot be decoded.
    pub fn load_all(&self) -> Result<Vec<SessionNote>, StorageError> {
        match self.kv.kv_get(NOTES_KEY)? {
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json).map_err(|e| StorageError::Corrupted {
                key: NOTES_KEY.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Like [`Self::load_all`], but degrades to an empty log. The error, if
    /// any, is handed back alongside instead of aborting.
    pub fn load_all_or_empty(&self) -> (Vec<SessionNote>, Option<StorageError>) {
        match self.load_all() {
            Ok(notes) => (notes, None),
            Err(e) => {
                tracing::warn!(error = %e, "note log unreadable; showing empty log");
                (Vec::new(), Some(e))
            }
        }
    }

    /// Append the trimmed contents of `buffer` as a new note tagged with
    /// `cycle`, persist the log, and clear `buffer`.
    ///
    /// Nothing is written and `buffer` is left untouched on error. An
    /// unreadable existing log is reported rather than overwritten.
    pub fn save(&self, buffer: &mut String, cycle: u64) -> Result<SessionNote, CoreError> {
        let content = buffer.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyNote.into());
        }

        let mut notes = self.load_all()?;
        let note = SessionNote {
            id: Uuid::new_v4().to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            cycle,
        };
        notes.push(note.clone());

        let json = serde_json::to_string(&notes).map_err(|e| StorageError::Serialize {
            key: NOTES_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.kv.kv_set(NOTES_KEY, &json)?;

        buffer.clear();
        tracing::info!(note_id = %note.id, cycle, total = notes.len(), "session note saved");
        Ok(note)
    }
}
