//! pitchroom-core: shared types for the Pitchroom training simulator.
//!
//! Everything the other crates exchange lives here: conversation messages and
//! session configuration, the client persona and scenario that parameterize a
//! simulation, voice/recording value types, and the post-session analysis
//! record. This crate holds no I/O and no async code.

mod analysis;
mod config;
mod error;
mod types;
mod voice;

pub use analysis::{
    AnalysisResult, CategoryScore, Sentiment, Speaker, TranscriptAnnotation,
};
pub use config::RuntimeConfig;
pub use error::{ConfigError, CoreResult};
pub use types::{
    ClientPersona, ConversationConfig, ConversationMessage, ConversationMode, Difficulty,
    PersonaTone, Role, ScenarioConfig,
};
pub use voice::{
    AudioDeviceInfo, RecognitionResult, RecordedAudio, RecordingSnapshot, SynthesisResult,
    VoiceConfig,
};
