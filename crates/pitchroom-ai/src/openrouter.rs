//! OpenRouter adapter: the full provider contract over an OpenAI-compatible
//! HTTP API.
//!
//! Endpoints used: `/chat/completions` (generation, streaming, analysis,
//! translation), `/audio/speech` (synthesis), `/audio/transcriptions`
//! (recognition), `/models` (health). Transport and auth live here; nothing
//! above this layer knows about HTTP.

use crate::capability::Capability;
use crate::error::{AiError, AiResult};
use crate::prompt::{build_analysis_prompt, build_system_prompt, ANALYSIS_SYSTEM};
use crate::provider::{AiProvider, ChunkSink};
use crate::transcript::annotate_transcript;
use async_trait::async_trait;
use futures_util::StreamExt;
use pitchroom_core::{
    AnalysisResult, CategoryScore, ConversationConfig, ConversationMessage, RecognitionResult,
    RuntimeConfig, SynthesisResult, VoiceConfig,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Confidence reported for transcriptions. The transcription endpoint
/// returns no confidence score, so the adapter reports this documented
/// conservative constant rather than fabricate variance.
pub const DEFAULT_RECOGNITION_CONFIDENCE: f32 = 0.95;

/// Rough speech rate used to estimate synthesis duration, because the speech
/// endpoint returns audio bytes with no duration metadata.
const SYNTHESIS_CHARS_PER_SECOND: u64 = 10;

const DEFAULT_TTS_MODEL: &str = "tts-1";
const DEFAULT_STT_MODEL: &str = "whisper-1";

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct RawCategory {
    score: f32,
    feedback: String,
    #[serde(default)]
    examples: Vec<String>,
}

impl From<RawCategory> for CategoryScore {
    fn from(raw: RawCategory) -> Self {
        CategoryScore {
            score: raw.score,
            feedback: raw.feedback,
            examples: raw.examples,
        }
    }
}

#[derive(Deserialize)]
struct RawAnalysis {
    overall_score: f32,
    communication: RawCategory,
    content: RawCategory,
    tone: RawCategory,
    persuasion: RawCategory,
    improvements: Vec<String>,
    strengths: Vec<String>,
}

/// Provider adapter for OpenRouter (or any OpenAI-compatible backend).
#[derive(Debug)]
pub struct OpenRouterProvider {
    base_url: String,
    api_key: String,
    /// Fallback chat model for calls that carry no per-session config.
    chat_model: String,
    tts_model: String,
    stt_model: String,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    /// Build from `RuntimeConfig`. Fails when no API key is configured.
    pub fn from_config(config: &RuntimeConfig) -> AiResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            AiError::InvalidConfig(pitchroom_core::ConfigError::Missing(
                "PITCHROOM_API_KEY".to_string(),
            ))
        })?;
        Ok(Self::new(
            &config.api_base,
            api_key,
            &config.model,
            config.request_timeout_secs,
        ))
    }

    /// Build from environment (see `RuntimeConfig` docs for variables).
    pub fn from_env() -> AiResult<Self> {
        Self::from_config(&RuntimeConfig::from_env())
    }

    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        chat_model: &str,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            chat_model: chat_model.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            stt_model: DEFAULT_STT_MODEL.to_string(),
            client,
        }
    }

    pub fn with_tts_model(mut self, model: impl Into<String>) -> Self {
        self.tts_model = model.into();
        self
    }

    pub fn with_stt_model(mut self, model: impl Into<String>) -> Self {
        self.stt_model = model.into();
        self
    }

    fn wire_messages(
        system_prompt: String,
        messages: &[ConversationMessage],
    ) -> Vec<WireMessage> {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(WireMessage {
            role: "system".to_string(),
            content: system_prompt,
        });
        wire.extend(messages.iter().map(|msg| WireMessage {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        }));
        wire
    }

    /// One non-streamed chat completion; returns the first choice's content.
    async fn chat(&self, body: &ChatRequest) -> AiResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://pitchroom.local")
            .header("X-Title", "Pitchroom")
            .json(body)
            .send()
            .await
            .map_err(|e| AiError::GenerationFailed(format!("request failed: {e}")))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AiError::GenerationFailed(format!(
                "API error {status}: {text}"
            )));
        }

        let parsed: ChatResponse = res
            .json()
            .await
            .map_err(|e| AiError::GenerationFailed(format!("response parse failed: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AiError::GenerationFailed("empty response".to_string()))
    }
}

/// Extract the text delta from one SSE line, if it carries one.
fn delta_from_sse_line(line: &str) -> Option<String> {
    let data = line.strip_prefix("data: ")?;
    if data == "[DONE]" {
        return None;
    }
    let json: serde_json::Value = serde_json::from_str(data).ok()?;
    json["choices"][0]["delta"]["content"]
        .as_str()
        .map(String::from)
}

/// Parse and bounds-check the analyst's JSON reply, then attach the
/// per-message transcript annotation.
fn parse_analysis(
    content: &str,
    messages: &[ConversationMessage],
) -> AiResult<AnalysisResult> {
    let raw: RawAnalysis = serde_json::from_str(content.trim()).map_err(|e| {
        AiError::GenerationFailed(format!("analysis response was not the expected JSON: {e}"))
    })?;

    let result = AnalysisResult {
        overall_score: raw.overall_score,
        communication: raw.communication.into(),
        content: raw.content.into(),
        tone: raw.tone.into(),
        persuasion: raw.persuasion.into(),
        improvements: raw.improvements,
        strengths: raw.strengths,
        transcript: annotate_transcript(messages),
    };
    if !result.scores_in_bounds() {
        return Err(AiError::GenerationFailed(
            "analysis scores out of range [0, 100]".to_string(),
        ));
    }
    Ok(result)
}

#[async_trait]
impl AiProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn capabilities(&self) -> &[Capability] {
        &Capability::ALL
    }

    async fn generate_response(
        &self,
        messages: &[ConversationMessage],
        config: &ConversationConfig,
    ) -> AiResult<String> {
        let system =
            build_system_prompt(&config.persona, &config.scenario, &config.language);
        let body = ChatRequest {
            model: config.model.clone(),
            messages: Self::wire_messages(system, messages),
            temperature: Some(0.7),
            max_tokens: Some(500),
            stream: None,
            response_format: None,
        };
        self.chat(&body).await
    }

    async fn stream_response(
        &self,
        messages: &[ConversationMessage],
        config: &ConversationConfig,
        on_chunk: ChunkSink<'_>,
    ) -> AiResult<()> {
        let system =
            build_system_prompt(&config.persona, &config.scenario, &config.language);
        let body = ChatRequest {
            model: config.model.clone(),
            messages: Self::wire_messages(system, messages),
            temperature: Some(0.7),
            max_tokens: Some(500),
            stream: Some(true),
            response_format: None,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://pitchroom.local")
            .header("X-Title", "Pitchroom")
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::GenerationFailed(format!("request failed: {e}")))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AiError::GenerationFailed(format!(
                "API error {status}: {text}"
            )));
        }

        // SSE: "data: {json}" lines, "data: [DONE]" terminator. A line can
        // span two network chunks, so carry the partial tail across reads.
        let mut stream = res.bytes_stream();
        let mut buffer = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| AiError::GenerationFailed(format!("stream error: {e}")))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));
            while let Some(pos) = buffer.find('\n') {
                let line: String = buffer.drain(..=pos).collect();
                let line = line.trim();
                if line == "data: [DONE]" {
                    return Ok(());
                }
                if let Some(delta) = delta_from_sse_line(line) {
                    on_chunk(&delta);
                }
            }
        }
        Ok(())
    }

    async fn synthesize_voice(
        &self,
        text: &str,
        config: &VoiceConfig,
    ) -> AiResult<SynthesisResult> {
        config.validate()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AiError::SynthesisFailed("empty text".to_string()));
        }

        // The speech endpoint accepts speed but has no pitch parameter;
        // pitch is boundary-validated only.
        let url = format!("{}/audio/speech", self.base_url);
        let body = serde_json::json!({
            "model": self.tts_model,
            "input": text,
            "voice": config.voice_id,
            "speed": config.speed,
        });
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::SynthesisFailed(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AiError::SynthesisFailed(format!(
                "TTS API error {status}: {text}"
            )));
        }

        let bytes = res
            .bytes()
            .await
            .map_err(|e| AiError::SynthesisFailed(e.to_string()))?;

        let path = std::env::temp_dir().join(format!("pitchroom-tts-{}.mp3", uuid::Uuid::new_v4()));
        std::fs::write(&path, &bytes)
            .map_err(|e| AiError::SynthesisFailed(format!("write failed: {e}")))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Synthesized speech");

        // The endpoint returns no duration; estimate at ~10 characters/second.
        let duration_seconds = (text.chars().count() as u64 / SYNTHESIS_CHARS_PER_SECOND).max(1);
        Ok(SynthesisResult {
            audio_url: format!("file://{}", path.display()),
            duration_seconds,
        })
    }

    async fn recognize_speech(&self, audio: &[u8], language: &str) -> AiResult<RecognitionResult> {
        if audio.is_empty() {
            return Err(AiError::RecognitionFailed(
                "empty audio input".to_string(),
            ));
        }

        let url = format!("{}/audio/transcriptions", self.base_url);
        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| AiError::RecognitionFailed(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.stt_model.clone())
            .text("language", language.to_string());

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AiError::RecognitionFailed(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AiError::RecognitionFailed(format!(
                "STT API error {status}: {text}"
            )));
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AiError::RecognitionFailed(e.to_string()))?;
        let text = json
            .get("text")
            .and_then(|t| t.as_str())
            .unwrap_or("")
            .trim()
            .to_string();

        Ok(RecognitionResult {
            text,
            confidence: DEFAULT_RECOGNITION_CONFIDENCE,
        })
    }

    async fn analyze_conversation(
        &self,
        messages: &[ConversationMessage],
        config: &ConversationConfig,
    ) -> AiResult<AnalysisResult> {
        let body = ChatRequest {
            model: config.model.clone(),
            messages: vec![
                WireMessage {
                    role: "system".to_string(),
                    content: ANALYSIS_SYSTEM.to_string(),
                },
                WireMessage {
                    role: "user".to_string(),
                    content: build_analysis_prompt(messages, config),
                },
            ],
            temperature: Some(0.3),
            max_tokens: Some(2048),
            stream: None,
            response_format: Some(serde_json::json!({ "type": "json_object" })),
        };
        let content = self.chat(&body).await?;
        parse_analysis(&content, messages)
    }

    async fn translate_text(&self, text: &str, from_lang: &str, to_lang: &str) -> AiResult<String> {
        let body = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![
                WireMessage {
                    role: "system".to_string(),
                    content: format!(
                        "Translate the user's message from {from_lang} to {to_lang}. \
                         Output only the translation."
                    ),
                },
                WireMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            temperature: Some(0.0),
            max_tokens: None,
            stream: None,
            response_format: None,
        };
        self.chat(&body).await
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/models", self.base_url);
        match self.client.get(&url).bearer_auth(&self.api_key).send().await {
            Ok(res) => res.status().is_success(),
            Err(e) => {
                warn!("Health check failed: {e}");
                false
            }
        }
    }
}
