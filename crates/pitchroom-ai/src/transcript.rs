//! Transcript annotation shared by every provider.
//!
//! Downstream consumers assume each `AnalysisResult` carries exactly one
//! annotation per input message, in input order, so the augmentation lives
//! here rather than inside any single adapter.

use pitchroom_core::{ConversationMessage, Role, Sentiment, Speaker, TranscriptAnnotation};

/// Confidence reported for annotations when the backend supplies none.
/// A fixed documented constant, not a measurement.
pub const DEFAULT_ANNOTATION_CONFIDENCE: f32 = 0.9;

/// Build the per-message transcript annotation for an analysis result.
/// Sentiment defaults to neutral and confidence to the documented constant
/// when the backend does not supply them.
pub fn annotate_transcript(messages: &[ConversationMessage]) -> Vec<TranscriptAnnotation> {
    messages
        .iter()
        .map(|msg| TranscriptAnnotation {
            timestamp: msg.timestamp,
            text: msg.content.clone(),
            speaker: match msg.role {
                Role::User => Speaker::User,
                Role::Assistant | Role::System => Speaker::Ai,
            },
            sentiment: Sentiment::Neutral,
            confidence: DEFAULT_ANNOTATION_CONFIDENCE,
            tags: Vec::new(),
        })
        .collect()
}
