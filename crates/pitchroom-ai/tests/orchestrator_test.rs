//! Orchestrator dispatch behavior across registered providers.

use async_trait::async_trait;
use pitchroom_ai::{
    AiError, AiOrchestrator, AiProvider, AiResult, Capability, ChunkSink, ScriptedProvider,
};
use pitchroom_core::{
    ClientPersona, ConversationConfig, ConversationMessage, ConversationMode, ScenarioConfig,
    VoiceConfig,
};
use std::sync::Arc;

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
            title: "Test Scenario".to_string(),
            ..Default::default()
        },
        language: "en".to_string(),
        mode: ConversationMode::Text,
    }
}

/// A provider that only generates text; every optional operation is
/// undeclared and left on the trait's default (failing) body.
struct TextOnly;

#[async_trait]
impl AiProvider for TextOnly {
    fn name(&self) -> &str {
        "text-only"
    }

    fn version(&self) -> &str {
        "0.0.1"
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::TextGeneration]
    }

    async fn generate_response(
        &self,
        _messages: &[ConversationMessage],
        _config: &ConversationConfig,
    ) -> AiResult<String> {
        Ok("text only".to_string())
    }

    async fn stream_response(
        &self,
        _messages: &[ConversationMessage],
        _config: &ConversationConfig,
        on_chunk: ChunkSink<'_>,
    ) -> AiResult<()> {
        on_chunk("text ");
        on_chunk("only");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        false
    }
}

#[tokio::test]
async fn default_and_named_dispatch() {
    let orchestrator = AiOrchestrator::new();
    orchestrator.register("a", Arc::new(ScriptedProvider::named("a")));
    orchestrator.register("b", Arc::new(ScriptedProvider::named("b")));

    let messages = vec![ConversationMessage::user("hello")];

    // No name: the default (first registered) must answer.
    let reply = orchestrator
        .generate_response(&messages, &config("a"), None)
        .await
        .unwrap();
    assert!(reply.starts_with("[a]"), "expected provider a, got {reply}");

    // Explicit name: that provider must answer.
    let reply = orchestrator
        .generate_response(&messages, &config("b"), Some("b"))
        .await
        .unwrap();
    assert!(reply.starts_with("[b]"), "expected provider b, got {reply}");
}

#[tokio::test]
async fn set_default_switches_dispatch() {
    let orchestrator = AiOrchestrator::new();
    orchestrator.register("a", Arc::new(ScriptedProvider::named("a")));
    orchestrator.register("b", Arc::new(ScriptedProvider::named("b")));
    orchestrator.set_default("b").unwrap();

    let messages = vec![ConversationMessage::user("hello")];
    let reply = orchestrator
        .generate_response(&messages, &config("b"), None)
        .await
        .unwrap();
    assert!(reply.starts_with("[b]"));
}

#[tokio::test]
async fn streamed_chunks_concatenate_to_generated_response() {
    let orchestrator = AiOrchestrator::new();
    orchestrator.register("scripted", Arc::new(ScriptedProvider::new()));

    let messages = vec![ConversationMessage::user("tell me more")];
    let full = orchestrator
        .generate_response(&messages, &config("scripted"), None)
        .await
        .unwrap();

    let mut streamed = String::new();
    orchestrator
        .stream_response(&messages, &config("scripted"), &mut |chunk| {
            streamed.push_str(chunk)
        }, None)
        .await
        .unwrap();

    assert_eq!(streamed, full);
}

#[tokio::test]
async fn health_check_fans_out_in_registration_order() {
    let orchestrator = AiOrchestrator::new();
    orchestrator.register("alpha", Arc::new(ScriptedProvider::named("alpha")));
    orchestrator.register("beta", Arc::new(TextOnly));
    orchestrator.register("gamma", Arc::new(ScriptedProvider::named("gamma")));

    let report = orchestrator.health_check(None).await.unwrap();
    let names: Vec<_> = report.iter().map(|h| h.provider.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    assert!(report[0].healthy);
    assert!(!report[1].healthy);
    assert!(report[2].healthy);
}

#[tokio::test]
async fn health_check_single_provider() {
    let orchestrator = AiOrchestrator::new();
    orchestrator.register("alpha", Arc::new(ScriptedProvider::named("alpha")));
    let report = orchestrator.health_check(Some("alpha")).await.unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].provider, "alpha");
}

#[tokio::test]
async fn unsupported_capability_is_a_named_failure() {
    let orchestrator = AiOrchestrator::new();
    orchestrator.register("text-only", Arc::new(TextOnly));

    let err = orchestrator
        .translate_text("hello", "en", "de", Some("text-only"))
        .await
        .unwrap_err();
    match err {
        AiError::CapabilityUnsupported {
            provider,
            operation,
        } => {
            assert_eq!(provider, "text-only");
            assert_eq!(operation, "translation");
        }
        other => panic!("expected CapabilityUnsupported, got {other:?}"),
    }

    let err = orchestrator
        .synthesize_voice("hello", &VoiceConfig::new("x", "voice"), Some("text-only"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "capability_unsupported");
}

#[tokio::test]
async fn zero_byte_recognition_fails() {
    let orchestrator = AiOrchestrator::new();
    orchestrator.register("scripted", Arc::new(ScriptedProvider::new()));

    let err = orchestrator
        .recognize_speech(&[], "en", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "recognition_failed");
}

#[tokio::test]
async fn unknown_provider_name_fails_every_operation() {
    let orchestrator = AiOrchestrator::new();
    orchestrator.register("scripted", Arc::new(ScriptedProvider::new()));

    let messages = vec![ConversationMessage::user("hi")];
    let err = orchestrator
        .generate_response(&messages, &config("ghost"), Some("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::ProviderNotFound(name) if name == "ghost"));
}
