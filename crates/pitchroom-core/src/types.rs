//! Conversation, persona, and scenario types.
//!
//! A session binds one `ConversationConfig` (provider, model, persona,
//! scenario, language, mode) for its whole lifetime; the message log is
//! append-only and ordered by submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Who authored a message in the session log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[default]
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// One turn in a conversation. Immutable once created; ordering within a
/// session is submission order and timestamps are monotonic along the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Opaque per-message extras (e.g. recognition confidence for voice turns).
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Whether turns are typed or spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationMode {
    Voice,
    #[default]
    Text,
}

/// How the simulated client comes across in conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaTone {
    Friendly,
    #[default]
    Professional,
    Skeptical,
    Aggressive,
    Neutral,
}

impl PersonaTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaTone::Friendly => "friendly",
            PersonaTone::Professional => "professional",
            PersonaTone::Skeptical => "skeptical",
            PersonaTone::Aggressive => "aggressive",
            PersonaTone::Neutral => "neutral",
        }
    }
}

/// Difficulty of the simulated counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// The simulated client. Only parameterizes prompt construction; the core
/// never mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientPersona {
    pub name: String,
    pub role: String,
    /// Personality traits, in presentation order.
    pub personality: Vec<String>,
    pub background: String,
    pub goals: Vec<String>,
    /// Objections the persona should raise during the conversation.
    pub objections: Vec<String>,
    #[serde(default)]
    pub tone: PersonaTone,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// The training scenario the conversation plays out in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub title: String,
    pub description: String,
    pub industry: String,
    pub product: String,
    /// Intended session length; informational, not enforced by the core.
    #[serde(default)]
    pub duration_minutes: u32,
    pub objectives: Vec<String>,
    pub success_criteria: Vec<String>,
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

/// Per-session configuration. Constructed once, read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Provider name as registered with the orchestrator.
    pub provider: String,
    pub model: String,
    pub persona: ClientPersona,
    pub scenario: ScenarioConfig,
    /// BCP-47-ish language code (e.g. "en", "pl", "de").
    pub language: String,
    #[serde(default)]
    pub mode: ConversationMode,
}
