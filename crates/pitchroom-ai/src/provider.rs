//! The provider contract: the interface every AI backend implements.

use crate::capability::Capability;
use crate::error::{AiError, AiResult};
use async_trait::async_trait;
use pitchroom_core::{
    AnalysisResult, ConversationConfig, ConversationMessage, RecognitionResult, SynthesisResult,
    VoiceConfig,
};

/// Callback receiving streamed text fragments in generation order.
pub type ChunkSink<'a> = &'a mut (dyn FnMut(&str) + Send);

/// Contract for an interchangeable AI backend.
///
/// `generate_response` and `stream_response` are the baseline every provider
/// must implement. The remaining operations are optional: a provider declares
/// them via `capabilities()` and the default bodies fail with
/// `CapabilityUnsupported` naming the provider and operation; an unsupported
/// call never silently no-ops.
#[async_trait]
pub trait AiProvider: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    fn capabilities(&self) -> &[Capability];

    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Generate the next assistant turn for the given history.
    async fn generate_response(
        &self,
        messages: &[ConversationMessage],
        config: &ConversationConfig,
    ) -> AiResult<String>;

    /// Stream the next assistant turn. `on_chunk` is invoked zero or more
    /// times, in generation order, before this call settles; concatenating
    /// all chunks yields the full response.
    async fn stream_response(
        &self,
        messages: &[ConversationMessage],
        config: &ConversationConfig,
        on_chunk: ChunkSink<'_>,
    ) -> AiResult<()>;

    /// Synthesize speech for `text`, returning a URL-addressable resource.
    async fn synthesize_voice(
        &self,
        _text: &str,
        _config: &VoiceConfig,
    ) -> AiResult<SynthesisResult> {
        Err(AiError::unsupported(self.name(), "voice-synthesis"))
    }

    /// Transcribe recorded audio (WAV bytes). Zero-byte input is a
    /// `RecognitionFailed` error, never an empty-string success.
    async fn recognize_speech(&self, _audio: &[u8], _language: &str) -> AiResult<RecognitionResult> {
        Err(AiError::unsupported(self.name(), "speech-recognition"))
    }

    /// Analyze a finished conversation. The result always carries one
    /// transcript annotation per input message, in input order.
    async fn analyze_conversation(
        &self,
        _messages: &[ConversationMessage],
        _config: &ConversationConfig,
    ) -> AiResult<AnalysisResult> {
        Err(AiError::unsupported(self.name(), "analysis"))
    }

    async fn translate_text(
        &self,
        _text: &str,
        _from_lang: &str,
        _to_lang: &str,
    ) -> AiResult<String> {
        Err(AiError::unsupported(self.name(), "translation"))
    }

    /// Whether the backend is currently reachable. Failures are reported as
    /// `false`, never as an error.
    async fn health_check(&self) -> bool {
        true
    }
}
