//! Conversation driver behavior: log ordering, rollback, streaming, and the
//! store handoff.

use async_trait::async_trait;
use pitchroom_ai::{
    AiError, AiOrchestrator, AiProvider, AiResult, Capability, ChunkSink, ScriptedProvider,
};
use pitchroom_core::{
    ClientPersona, ConversationConfig, ConversationMessage, ConversationMode, RecordedAudio, Role,
    ScenarioConfig, VoiceConfig,
};
use pitchroom_session::{ConversationSession, MemoryStore, SessionStore, SledSessionStore};
use std::sync::Arc;
use uuid::Uuid;

fn config(provider: &str) -> ConversationConfig {
    ConversationConfig {
        provider: provider.to_string(),
        model: "test-model".to_string(),
        persona: ClientPersona {
            name: "Test Client".to_string(),
            role: "Buyer".to_string(),
            ..Default::default()
        },
        scenario: ScenarioConfig {
            title: "Demo Scenario".to_string(),
            ..Default::default()
        },
        language: "en".to_string(),
        mode: ConversationMode::Text,
    }
}

fn scripted_orchestrator() -> Arc<AiOrchestrator> {
    let orchestrator = AiOrchestrator::new();
    orchestrator.register("scripted", Arc::new(ScriptedProvider::new()));
    Arc::new(orchestrator)
}

/// Provider whose generation always fails; used to check rollback.
struct Failing;

#[async_trait]
impl AiProvider for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn version(&self) -> &str {
        "0.0.1"
    }

    fn capabilities(&self) -> &[Capability] {
        &Capability::ALL
    }

    async fn generate_response(
        &self,
        _messages: &[ConversationMessage],
        _config: &ConversationConfig,
    ) -> AiResult<String> {
        Err(AiError::GenerationFailed("backend down".to_string()))
    }

    async fn stream_response(
        &self,
        _messages: &[ConversationMessage],
        _config: &ConversationConfig,
        on_chunk: ChunkSink<'_>,
    ) -> AiResult<()> {
        on_chunk("partial ");
        Err(AiError::GenerationFailed("backend died mid-stream".to_string()))
    }
}

#[tokio::test]
async fn send_text_appends_user_and_assistant_in_order() {
    let mut session = ConversationSession::new(config("scripted"), scripted_orchestrator())
        .with_greeting("Hello, I have fifteen minutes.");

    session.send_text("Let me tell you about our platform.").await.unwrap();

    let log = session.messages();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].role, Role::Assistant);
    assert_eq!(log[1].role, Role::User);
    assert_eq!(log[2].role, Role::Assistant);
    assert!(log[0].timestamp <= log[1].timestamp);
    assert!(log[1].timestamp <= log[2].timestamp);
}

#[tokio::test]
async fn failed_generation_rolls_back_the_user_turn() {
    let orchestrator = AiOrchestrator::new();
    orchestrator.register("failing", Arc::new(Failing));
    let mut session = ConversationSession::new(config("failing"), Arc::new(orchestrator));

    let err = session.send_text("hello?").await.unwrap_err();
    assert_eq!(err.kind(), "generation_failed");
    assert!(session.messages().is_empty(), "log must be unchanged on failure");
}

#[tokio::test]
async fn failed_stream_rolls_back_the_user_turn() {
    let orchestrator = AiOrchestrator::new();
    orchestrator.register("failing", Arc::new(Failing));
    let mut session = ConversationSession::new(config("failing"), Arc::new(orchestrator));

    let mut seen = String::new();
    let err = session
        .send_text_streamed("hello?", &mut |chunk| seen.push_str(chunk))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "generation_failed");
    assert!(session.messages().is_empty());
    assert_eq!(seen, "partial ");
}

#[tokio::test]
async fn streamed_reply_is_stored_whole() {
    let mut session = ConversationSession::new(config("scripted"), scripted_orchestrator());

    let mut streamed = String::new();
    session
        .send_text_streamed("Tell me about pricing.", &mut |chunk| {
            streamed.push_str(chunk)
        })
        .await
        .unwrap();

    let log = session.messages();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].content, streamed);
}

#[tokio::test]
async fn submit_audio_goes_through_recognition() {
    let mut session = ConversationSession::new(config("scripted"), scripted_orchestrator());

    let audio = RecordedAudio {
        data: vec![0u8; 128],
        sample_rate: 16000,
        duration_seconds: 1,
    };
    session.submit_audio(&audio).await.unwrap();

    let log = session.messages();
    assert_eq!(log.len(), 2);
    assert!(log[0].content.contains("scripted transcription"));
    assert!(log[0].metadata.contains_key("recognition_confidence"));
}

#[tokio::test]
async fn empty_audio_fails_and_leaves_log_unchanged() {
    let mut session = ConversationSession::new(config("scripted"), scripted_orchestrator());

    let audio = RecordedAudio {
        data: Vec::new(),
        sample_rate: 16000,
        duration_seconds: 0,
    };
    let err = session.submit_audio(&audio).await.unwrap_err();
    assert_eq!(err.kind(), "recognition_failed");
    assert!(session.messages().is_empty());
}

#[tokio::test]
async fn synthesize_reply_needs_an_assistant_turn() {
    let session = ConversationSession::new(config("scripted"), scripted_orchestrator());
    let err = session
        .synthesize_reply(&VoiceConfig::new("scripted", "alloy"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "no_assistant_turn");
}

#[tokio::test]
async fn finish_analyzes_and_persists() {
    let mut session = ConversationSession::new(config("scripted"), scripted_orchestrator());
    session.send_text("First question.").await.unwrap();
    session.send_text("Second question.").await.unwrap();

    let store = MemoryStore::new();
    let analysis = session.finish(Some(&store)).await.unwrap();

    assert!(analysis.scores_in_bounds());
    assert_eq!(analysis.transcript.len(), session.messages().len());

    let stored = store.load_transcript(session.id()).unwrap().unwrap();
    assert_eq!(stored.len(), session.messages().len());
    assert!(store.load_analysis(session.id()).unwrap().is_some());
}

#[tokio::test]
async fn sled_store_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = SledSessionStore::open(dir.path()).unwrap();

    let id = Uuid::new_v4();
    let messages = vec![
        ConversationMessage::user("hello"),
        ConversationMessage::assistant("hi"),
    ];
    store.save_transcript(id, &messages).unwrap();

    let loaded = store.load_transcript(id).unwrap().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].content, "hello");
    assert_eq!(loaded[1].role, Role::Assistant);
    assert!(store.load_transcript(Uuid::new_v4()).unwrap().is_none());
}
