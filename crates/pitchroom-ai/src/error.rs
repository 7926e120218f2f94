//! Error types for the AI layer.

use thiserror::Error;

/// Result type alias for AI operations.
pub type AiResult<T> = Result<T, AiError>;

/// Errors that can occur when dispatching to or calling an AI backend.
///
/// Configuration and misuse errors (`ProviderNotFound`,
/// `CapabilityUnsupported`, `InvalidConfig`) fail fast and are fatal to the
/// call, not the process. Backend failures carry the underlying cause and are
/// always surfaced, never swallowed; no automatic retry happens here.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    #[error("provider '{provider}' does not support {operation}")]
    CapabilityUnsupported {
        provider: String,
        operation: &'static str,
    },

    #[error("generation failed: {0}")]
    GenerationFailed(String),

    #[error("voice synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("speech recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] pitchroom_core::ConfigError),
}

impl AiError {
    /// Shorthand for an unsupported-operation failure naming the provider.
    pub fn unsupported(provider: &str, operation: &'static str) -> Self {
        AiError::CapabilityUnsupported {
            provider: provider.to_string(),
            operation,
        }
    }

    /// Stable machine-readable kind for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            AiError::ProviderNotFound(_) => "provider_not_found",
            AiError::CapabilityUnsupported { .. } => "capability_unsupported",
            AiError::GenerationFailed(_) => "generation_failed",
            AiError::SynthesisFailed(_) => "synthesis_failed",
            AiError::RecognitionFailed(_) => "recognition_failed",
            AiError::InvalidConfig(_) => "invalid_config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_names_provider_and_operation() {
        let err = AiError::unsupported("scripted", "translation");
        let msg = err.to_string();
        assert!(msg.contains("scripted"));
        assert!(msg.contains("translation"));
        assert_eq!(err.kind(), "capability_unsupported");
    }
}
