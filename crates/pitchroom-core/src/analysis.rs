//! Post-session analysis record.
//!
//! Produced once per completed session and append-only history afterwards.
//! Every `AnalysisResult` carries exactly one transcript annotation per input
//! message, in input order; downstream consumers rely on that alignment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker attribution in the transcript annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Ai,
}

/// Sentiment label for a single transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

/// Score plus free-text feedback for one evaluation category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Bounded to [0, 100].
    pub score: f32,
    pub feedback: String,
    /// Quoted examples from the conversation supporting the score.
    pub examples: Vec<String>,
}

impl CategoryScore {
    pub fn in_bounds(&self) -> bool {
        (0.0..=100.0).contains(&self.score)
    }
}

/// One annotated line of the conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptAnnotation {
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub speaker: Speaker,
    #[serde(default)]
    pub sentiment: Sentiment,
    /// Confidence in the sentiment label, [0, 1].
    pub confidence: f32,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Full analysis of a finished session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Bounded to [0, 100].
    pub overall_score: f32,
    pub communication: CategoryScore,
    pub content: CategoryScore,
    pub tone: CategoryScore,
    pub persuasion: CategoryScore,
    pub improvements: Vec<String>,
    pub strengths: Vec<String>,
    /// One entry per input message, in input order.
    pub transcript: Vec<TranscriptAnnotation>,
}

impl AnalysisResult {
    /// All scores within [0, 100].
    pub fn scores_in_bounds(&self) -> bool {
        (0.0..=100.0).contains(&self.overall_score)
            && self.communication.in_bounds()
            && self.content.in_bounds()
            && self.tone.in_bounds()
            && self.persuasion.in_bounds()
    }
}
