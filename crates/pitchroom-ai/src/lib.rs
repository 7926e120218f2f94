//! pitchroom-ai: one stable API surface over interchangeable AI backends.
//!
//! The `AiProvider` trait is the contract every backend implements; the
//! `AiOrchestrator` is a name-keyed registry that resolves a provider per
//! call, checks the declared capability, and forwards. The orchestrator adds
//! no retry, caching, or timeout policy of its own; that belongs to the
//! adapter or the caller.
//!
//! Two providers ship with the crate: `OpenRouterProvider` (OpenAI-compatible
//! HTTP backend) and `ScriptedProvider` (deterministic, in-process, used by
//! demos and tests).

pub mod capability;
pub mod error;
pub mod openrouter;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod scripted;
mod transcript;

pub use capability::Capability;
pub use error::{AiError, AiResult};
pub use openrouter::{OpenRouterProvider, DEFAULT_RECOGNITION_CONFIDENCE};
pub use orchestrator::{AiOrchestrator, ProviderHealth};
pub use prompt::{build_analysis_prompt, build_system_prompt};
pub use provider::{AiProvider, ChunkSink};
pub use scripted::ScriptedProvider;
pub use transcript::{annotate_transcript, DEFAULT_ANNOTATION_CONFIDENCE};
