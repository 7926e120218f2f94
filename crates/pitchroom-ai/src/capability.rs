//! Typed capability flags for optional provider operations.
//!
//! A provider declares up front which operations it supports; the
//! orchestrator checks the flag before dispatch so an unsupported call fails
//! with a named error instead of a missing-method surprise at runtime.

use serde::{Deserialize, Serialize};

/// A named operation a provider may or may not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    TextGeneration,
    VoiceSynthesis,
    SpeechRecognition,
    Analysis,
    Translation,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::TextGeneration => "text-generation",
            Capability::VoiceSynthesis => "voice-synthesis",
            Capability::SpeechRecognition => "speech-recognition",
            Capability::Analysis => "analysis",
            Capability::Translation => "translation",
        }
    }

    /// Every capability, for providers that implement the full contract.
    pub const ALL: [Capability; 5] = [
        Capability::TextGeneration,
        Capability::VoiceSynthesis,
        Capability::SpeechRecognition,
        Capability::Analysis,
        Capability::Translation,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&Capability::SpeechRecognition).unwrap();
        assert_eq!(json, "\"speech-recognition\"");
    }

    #[test]
    fn as_str_matches_serde_names() {
        for cap in Capability::ALL {
            let json = serde_json::to_string(&cap).unwrap();
            assert_eq!(json, format!("\"{}\"", cap.as_str()));
        }
    }
}
