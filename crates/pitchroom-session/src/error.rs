//! Error types for the session driver.

use pitchroom_ai::AiError;
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced by the conversation driver.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("store failure: {0}")]
    Store(String),

    #[error("no assistant turn available")]
    NoAssistantTurn,
}

impl SessionError {
    /// Stable machine-readable kind for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::Ai(e) => e.kind(),
            SessionError::Store(_) => "store_failed",
            SessionError::NoAssistantTurn => "no_assistant_turn",
        }
    }
}
