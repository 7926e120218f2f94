//! The conversation driver.

use crate::error::{SessionError, SessionResult};
use crate::store::SessionStore;
use pitchroom_ai::{AiOrchestrator, ChunkSink};
use pitchroom_core::{
    AnalysisResult, ConversationConfig, ConversationMessage, RecordedAudio, SynthesisResult,
    Role, VoiceConfig,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// One bounded conversation between the user and the simulated client.
///
/// Methods take `&mut self`, so no call on a session can start while a
/// streamed response is still settling: submission order and log order are
/// the same by construction. Backend failures never leave a half-appended
/// log: the user turn is rolled back when generation fails.
pub struct ConversationSession {
    id: Uuid,
    config: ConversationConfig,
    messages: Vec<ConversationMessage>,
    orchestrator: Arc<AiOrchestrator>,
}

impl ConversationSession {
    pub fn new(config: ConversationConfig, orchestrator: Arc<AiOrchestrator>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            config,
            messages: Vec::new(),
            orchestrator,
        };
        info!(session = %session.id, provider = %session.config.provider, "Session opened");
        session
    }

    /// Seed the log with an opening line from the simulated client.
    pub fn with_greeting(mut self, text: impl Into<String>) -> Self {
        self.messages.push(ConversationMessage::assistant(text));
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &ConversationConfig {
        &self.config
    }

    /// The ordered message log.
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    fn provider_name(&self) -> Option<&str> {
        if self.config.provider.is_empty() {
            None
        } else {
            Some(&self.config.provider)
        }
    }

    /// Append `user_msg`, generate the reply, append it. Rolls the user turn
    /// back when generation fails.
    async fn advance(&mut self, user_msg: ConversationMessage) -> SessionResult<&ConversationMessage> {
        self.messages.push(user_msg);
        let reply = self
            .orchestrator
            .generate_response(&self.messages, &self.config, self.provider_name())
            .await;
        match reply {
            Ok(text) => {
                self.messages.push(ConversationMessage::assistant(text));
                Ok(self.messages.last().expect("assistant turn just pushed"))
            }
            Err(e) => {
                self.messages.pop();
                Err(e.into())
            }
        }
    }

    /// Send a typed user turn and return the assistant's reply.
    pub async fn send_text(&mut self, text: impl Into<String>) -> SessionResult<&ConversationMessage> {
        self.advance(ConversationMessage::user(text)).await
    }

    /// Send a typed user turn, streaming the reply. `on_chunk` receives the
    /// fragments in generation order; the call settles only after the full
    /// reply has been appended to the log.
    pub async fn send_text_streamed(
        &mut self,
        text: impl Into<String>,
        on_chunk: ChunkSink<'_>,
    ) -> SessionResult<&ConversationMessage> {
        self.messages.push(ConversationMessage::user(text));
        let mut full = String::new();
        let result = {
            let mut tee = |chunk: &str| {
                full.push_str(chunk);
                on_chunk(chunk);
            };
            let provider = if self.config.provider.is_empty() {
                None
            } else {
                Some(self.config.provider.as_str())
            };
            self.orchestrator
                .stream_response(&self.messages, &self.config, &mut tee, provider)
                .await
        };
        match result {
            Ok(()) => {
                self.messages.push(ConversationMessage::assistant(full));
                Ok(self.messages.last().expect("assistant turn just pushed"))
            }
            Err(e) => {
                self.messages.pop();
                Err(e.into())
            }
        }
    }

    /// Voice path: recognize the recorded audio, then run the recognized
    /// text as a user turn. A recognition failure leaves the log unchanged.
    pub async fn submit_audio(&mut self, audio: &RecordedAudio) -> SessionResult<&ConversationMessage> {
        let recognition = self
            .orchestrator
            .recognize_speech(&audio.data, &self.config.language, self.provider_name())
            .await?;
        debug!(
            confidence = recognition.confidence,
            "Recognized voice turn"
        );
        let user_msg = ConversationMessage::user(recognition.text).with_metadata(
            "recognition_confidence",
            serde_json::json!(recognition.confidence),
        );
        self.advance(user_msg).await
    }

    /// Synthesize the most recent assistant turn for playback.
    pub async fn synthesize_reply(&self, voice: &VoiceConfig) -> SessionResult<SynthesisResult> {
        let last = self
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .ok_or(SessionError::NoAssistantTurn)?;
        let result = self
            .orchestrator
            .synthesize_voice(&last.content, voice, self.provider_name())
            .await?;
        Ok(result)
    }

    /// Analyze the finished conversation and hand transcript plus analysis
    /// to the store, keyed by this session's id.
    pub async fn finish(&self, store: Option<&dyn SessionStore>) -> SessionResult<AnalysisResult> {
        let analysis = self
            .orchestrator
            .analyze_conversation(&self.messages, &self.config, self.provider_name())
            .await?;
        if let Some(store) = store {
            store.save_transcript(self.id, &self.messages)?;
            store.save_analysis(self.id, &analysis)?;
        }
        info!(
            session = %self.id,
            score = analysis.overall_score,
            turns = self.messages.len(),
            "Session finished"
        );
        Ok(analysis)
    }
}
