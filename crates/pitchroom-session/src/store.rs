//! The persistence collaborator: session records keyed by session id.
//!
//! The core never persists state on its own; a finished session's transcript
//! and analysis are handed to a `SessionStore`. The sled implementation uses
//! one tree per record kind with JSON values.

use crate::error::{SessionError, SessionResult};
use pitchroom_core::{AnalysisResult, ConversationMessage};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

const TRANSCRIPT_TREE: &str = "transcripts";
const ANALYSIS_TREE: &str = "analyses";

/// Record store for finished sessions.
pub trait SessionStore: Send + Sync {
    fn save_transcript(
        &self,
        session_id: Uuid,
        messages: &[ConversationMessage],
    ) -> SessionResult<()>;

    fn save_analysis(&self, session_id: Uuid, analysis: &AnalysisResult) -> SessionResult<()>;

    fn load_transcript(&self, session_id: Uuid) -> SessionResult<Option<Vec<ConversationMessage>>>;

    fn load_analysis(&self, session_id: Uuid) -> SessionResult<Option<AnalysisResult>>;
}

/// Sled-backed store: `transcripts` and `analyses` trees, JSON values.
pub struct SledSessionStore {
    _db: sled::Db,
    transcripts: sled::Tree,
    analyses: sled::Tree,
}

impl SledSessionStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> SessionResult<Self> {
        let db = sled::open(path).map_err(|e| SessionError::Store(e.to_string()))?;
        let transcripts = db
            .open_tree(TRANSCRIPT_TREE)
            .map_err(|e| SessionError::Store(e.to_string()))?;
        let analyses = db
            .open_tree(ANALYSIS_TREE)
            .map_err(|e| SessionError::Store(e.to_string()))?;
        Ok(Self {
            _db: db,
            transcripts,
            analyses,
        })
    }

    fn put<T: serde::Serialize>(tree: &sled::Tree, key: Uuid, value: &T) -> SessionResult<()> {
        let bytes = serde_json::to_vec(value).map_err(|e| SessionError::Store(e.to_string()))?;
        tree.insert(key.as_bytes(), bytes)
            .map_err(|e| SessionError::Store(e.to_string()))?;
        tree.flush().map_err(|e| SessionError::Store(e.to_string()))?;
        Ok(())
    }

    fn get<T: serde::de::DeserializeOwned>(
        tree: &sled::Tree,
        key: Uuid,
    ) -> SessionResult<Option<T>> {
        let Some(bytes) = tree
            .get(key.as_bytes())
            .map_err(|e| SessionError::Store(e.to_string()))?
        else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| SessionError::Store(e.to_string()))
    }
}

impl SessionStore for SledSessionStore {
    fn save_transcript(
        &self,
        session_id: Uuid,
        messages: &[ConversationMessage],
    ) -> SessionResult<()> {
        Self::put(&self.transcripts, session_id, &messages)
    }

    fn save_analysis(&self, session_id: Uuid, analysis: &AnalysisResult) -> SessionResult<()> {
        Self::put(&self.analyses, session_id, analysis)
    }

    fn load_transcript(&self, session_id: Uuid) -> SessionResult<Option<Vec<ConversationMessage>>> {
        Self::get(&self.transcripts, session_id)
    }

    fn load_analysis(&self, session_id: Uuid) -> SessionResult<Option<AnalysisResult>> {
        Self::get(&self.analyses, session_id)
    }
}

/// In-memory store for tests and demos.
#[derive(Default)]
pub struct MemoryStore {
    transcripts: Mutex<HashMap<Uuid, Vec<ConversationMessage>>>,
    analyses: Mutex<HashMap<Uuid, AnalysisResult>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn save_transcript(
        &self,
        session_id: Uuid,
        messages: &[ConversationMessage],
    ) -> SessionResult<()> {
        self.transcripts
            .lock()
            .map_err(|e| SessionError::Store(e.to_string()))?
            .insert(session_id, messages.to_vec());
        Ok(())
    }

    fn save_analysis(&self, session_id: Uuid, analysis: &AnalysisResult) -> SessionResult<()> {
        self.analyses
            .lock()
            .map_err(|e| SessionError::Store(e.to_string()))?
            .insert(session_id, analysis.clone());
        Ok(())
    }

    fn load_transcript(&self, session_id: Uuid) -> SessionResult<Option<Vec<ConversationMessage>>> {
        Ok(self
            .transcripts
            .lock()
            .map_err(|e| SessionError::Store(e.to_string()))?
            .get(&session_id)
            .cloned())
    }

    fn load_analysis(&self, session_id: Uuid) -> SessionResult<Option<AnalysisResult>> {
        Ok(self
            .analyses
            .lock()
            .map_err(|e| SessionError::Store(e.to_string()))?
            .get(&session_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let messages = vec![ConversationMessage::user("hello")];
        store.save_transcript(id, &messages).unwrap();

        let loaded = store.load_transcript(id).unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].content, "hello");
        assert!(store.load_analysis(id).unwrap().is_none());
    }
}
