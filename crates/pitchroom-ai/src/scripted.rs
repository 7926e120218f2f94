//! Scripted provider: deterministic, in-process, no network.
//!
//! Use it to exercise the conversation loop and the orchestrator without an
//! API key. Output is a pure function of the input, so the streamed and
//! non-streamed paths always agree.

use crate::capability::Capability;
use crate::error::{AiError, AiResult};
use crate::provider::{AiProvider, ChunkSink};
use crate::transcript::annotate_transcript;
use async_trait::async_trait;
use pitchroom_core::{
    AnalysisResult, CategoryScore, ConversationConfig, ConversationMessage, RecognitionResult,
    Role, SynthesisResult, VoiceConfig,
};

const DEFAULT_REPLIES: [&str; 4] = [
    "That's interesting. Can you tell me more about the security model? We handle sensitive data.",
    "How does this compare to the system we run today? Replacing it is not a small decision.",
    "I'm concerned about the implementation timeline. We can't afford significant downtime.",
    "The pricing sounds reasonable, but I need to understand the total cost of ownership.",
];

/// Deterministic provider for demos and tests. The reply is selected by the
/// number of user turns in the input, so identical input gives identical
/// output across calls and across the streamed/non-streamed paths.
pub struct ScriptedProvider {
    name: String,
    replies: Vec<String>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::named("scripted")
    }

    /// A scripted provider answering under a different registry name. Replies
    /// are prefixed with the name so tests can tell providers apart.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: DEFAULT_REPLIES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_replies(mut self, replies: Vec<String>) -> Self {
        if !replies.is_empty() {
            self.replies = replies;
        }
        self
    }

    fn pick_reply(&self, messages: &[ConversationMessage]) -> String {
        let user_turns = messages.iter().filter(|m| m.role == Role::User).count();
        let index = user_turns.saturating_sub(1) % self.replies.len();
        format!("[{}] {}", self.name, self.replies[index])
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn capabilities(&self) -> &[Capability] {
        &Capability::ALL
    }

    async fn generate_response(
        &self,
        messages: &[ConversationMessage],
        _config: &ConversationConfig,
    ) -> AiResult<String> {
        Ok(self.pick_reply(messages))
    }

    async fn stream_response(
        &self,
        messages: &[ConversationMessage],
        _config: &ConversationConfig,
        on_chunk: ChunkSink<'_>,
    ) -> AiResult<()> {
        let reply = self.pick_reply(messages);
        // Deliver in word-sized fragments; concatenation equals the
        // non-streamed response for the same input.
        let mut rest = reply.as_str();
        while !rest.is_empty() {
            let split = rest
                .char_indices()
                .find(|(i, c)| *i > 0 && c.is_whitespace())
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            let (chunk, tail) = rest.split_at(split);
            on_chunk(chunk);
            rest = tail;
        }
        Ok(())
    }

    async fn synthesize_voice(&self, text: &str, config: &VoiceConfig) -> AiResult<SynthesisResult> {
        config.validate()?;
        if text.trim().is_empty() {
            return Err(AiError::SynthesisFailed("empty text".to_string()));
        }
        Ok(SynthesisResult {
            audio_url: format!("scripted://voice/{}", config.voice_id),
            duration_seconds: (text.chars().count() as u64 / 10).max(1),
        })
    }

    async fn recognize_speech(&self, audio: &[u8], language: &str) -> AiResult<RecognitionResult> {
        if audio.is_empty() {
            return Err(AiError::RecognitionFailed(
                "empty audio input".to_string(),
            ));
        }
        Ok(RecognitionResult {
            text: format!("[scripted transcription: {} bytes, {}]", audio.len(), language),
            confidence: 1.0,
        })
    }

    async fn analyze_conversation(
        &self,
        messages: &[ConversationMessage],
        config: &ConversationConfig,
    ) -> AiResult<AnalysisResult> {
        let category = |feedback: &str| CategoryScore {
            score: 70.0,
            feedback: feedback.to_string(),
            examples: messages
                .iter()
                .filter(|m| m.role == Role::User)
                .take(1)
                .map(|m| m.content.clone())
                .collect(),
        };
        Ok(AnalysisResult {
            overall_score: 70.0,
            communication: category("Clear and structured."),
            content: category("Relevant to the scenario."),
            tone: category("Professional throughout."),
            persuasion: category(&format!(
                "Objection handling matched the {} scenario.",
                config.scenario.title
            )),
            improvements: vec!["Ask more discovery questions.".to_string()],
            strengths: vec!["Stayed on topic.".to_string()],
            transcript: annotate_transcript(messages),
        })
    }

    async fn translate_text(&self, text: &str, from_lang: &str, to_lang: &str) -> AiResult<String> {
        Ok(format!("[{from_lang}->{to_lang}] {text}"))
    }
}
