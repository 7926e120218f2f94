//! pitchroom-session: drives one bounded conversation between the user and
//! the simulated client.
//!
//! The session owns the `ConversationConfig` and the ordered message log.
//! Turns go through the orchestrator (typed text directly, voice via
//! recognition first); `finish` produces the analysis and hands transcript
//! and result to the persistence collaborator keyed by session id.

pub mod error;
pub mod session;
pub mod store;

pub use error::{SessionError, SessionResult};
pub use session::ConversationSession;
pub use store::{MemoryStore, SessionStore, SledSessionStore};
