//! The AI orchestrator: a name-keyed provider registry behind one stable
//! call surface.
//!
//! Construct one orchestrator at session start and pass it by reference;
//! there is no hidden global instance. The registry is read-mostly after
//! startup registration; the map itself handles concurrent access and a
//! separate order list keeps health-check fan-out stable.

use crate::capability::Capability;
use crate::error::{AiError, AiResult};
use crate::provider::{AiProvider, ChunkSink};
use dashmap::DashMap;
use pitchroom_core::{
    AnalysisResult, ConversationConfig, ConversationMessage, RecognitionResult, SynthesisResult,
    VoiceConfig,
};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Health of one registered provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderHealth {
    pub provider: String,
    pub healthy: bool,
}

/// Stateless dispatcher over registered providers. Owns no session state.
#[derive(Default)]
pub struct AiOrchestrator {
    providers: DashMap<String, Arc<dyn AiProvider>>,
    /// Registration order; health-check fan-out iterates this, not the map.
    order: RwLock<Vec<String>>,
    default_provider: RwLock<Option<String>>,
}

impl AiOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under `name`. Overwriting an existing name is
    /// allowed and keeps the original registration position. The first
    /// provider registered becomes the default until `set_default` changes it.
    pub fn register(&self, name: impl Into<String>, provider: Arc<dyn AiProvider>) {
        let name = name.into();
        info!(provider = %name, "Registering AI provider");
        let previous = self.providers.insert(name.clone(), provider);
        if previous.is_none() {
            self.order.write().expect("order lock").push(name.clone());
        }
        let mut default = self.default_provider.write().expect("default lock");
        if default.is_none() {
            *default = Some(name);
        }
    }

    /// Make `name` the default provider. Fails if it was never registered.
    pub fn set_default(&self, name: &str) -> AiResult<()> {
        if !self.providers.contains_key(name) {
            return Err(AiError::ProviderNotFound(name.to_string()));
        }
        *self.default_provider.write().expect("default lock") = Some(name.to_string());
        Ok(())
    }

    /// Names of all registered providers, in registration order.
    pub fn provider_names(&self) -> Vec<String> {
        self.order.read().expect("order lock").clone()
    }

    /// Resolve a provider by name, or the default when `name` is `None`.
    pub fn resolve(&self, name: Option<&str>) -> AiResult<Arc<dyn AiProvider>> {
        let resolved = match name {
            Some(n) => n.to_string(),
            None => self
                .default_provider
                .read()
                .expect("default lock")
                .clone()
                .ok_or_else(|| AiError::ProviderNotFound("(no default provider)".to_string()))?,
        };
        self.providers
            .get(&resolved)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(AiError::ProviderNotFound(resolved))
    }

    fn resolve_with_capability(
        &self,
        name: Option<&str>,
        capability: Capability,
    ) -> AiResult<Arc<dyn AiProvider>> {
        let provider = self.resolve(name)?;
        if !provider.supports(capability) {
            return Err(AiError::unsupported(provider.name(), capability.as_str()));
        }
        Ok(provider)
    }

    pub async fn generate_response(
        &self,
        messages: &[ConversationMessage],
        config: &ConversationConfig,
        provider_name: Option<&str>,
    ) -> AiResult<String> {
        let provider = self.resolve_with_capability(provider_name, Capability::TextGeneration)?;
        debug!(provider = provider.name(), "Dispatching generation");
        provider.generate_response(messages, config).await
    }

    pub async fn stream_response(
        &self,
        messages: &[ConversationMessage],
        config: &ConversationConfig,
        on_chunk: ChunkSink<'_>,
        provider_name: Option<&str>,
    ) -> AiResult<()> {
        let provider = self.resolve_with_capability(provider_name, Capability::TextGeneration)?;
        provider.stream_response(messages, config, on_chunk).await
    }

    pub async fn synthesize_voice(
        &self,
        text: &str,
        config: &VoiceConfig,
        provider_name: Option<&str>,
    ) -> AiResult<SynthesisResult> {
        let provider = self.resolve_with_capability(provider_name, Capability::VoiceSynthesis)?;
        provider.synthesize_voice(text, config).await
    }

    pub async fn recognize_speech(
        &self,
        audio: &[u8],
        language: &str,
        provider_name: Option<&str>,
    ) -> AiResult<RecognitionResult> {
        let provider =
            self.resolve_with_capability(provider_name, Capability::SpeechRecognition)?;
        provider.recognize_speech(audio, language).await
    }

    pub async fn analyze_conversation(
        &self,
        messages: &[ConversationMessage],
        config: &ConversationConfig,
        provider_name: Option<&str>,
    ) -> AiResult<AnalysisResult> {
        let provider = self.resolve_with_capability(provider_name, Capability::Analysis)?;
        provider.analyze_conversation(messages, config).await
    }

    pub async fn translate_text(
        &self,
        text: &str,
        from_lang: &str,
        to_lang: &str,
        provider_name: Option<&str>,
    ) -> AiResult<String> {
        let provider = self.resolve_with_capability(provider_name, Capability::Translation)?;
        provider.translate_text(text, from_lang, to_lang).await
    }

    /// Check one provider, or fan out to all registered providers in
    /// registration order.
    pub async fn health_check(&self, provider_name: Option<&str>) -> AiResult<Vec<ProviderHealth>> {
        if let Some(name) = provider_name {
            let provider = self.resolve(Some(name))?;
            let healthy = provider.health_check().await;
            return Ok(vec![ProviderHealth {
                provider: name.to_string(),
                healthy,
            }]);
        }

        let names = self.provider_names();
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let provider = self.resolve(Some(&name))?;
            let healthy = provider.health_check().await;
            results.push(ProviderHealth {
                provider: name,
                healthy,
            });
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedProvider;

    #[test]
    fn resolve_unregistered_fails_regardless_of_registry_size() {
        let orchestrator = AiOrchestrator::new();
        assert!(matches!(
            orchestrator.resolve(Some("ghost")),
            Err(AiError::ProviderNotFound(_))
        ));

        for i in 0..5 {
            orchestrator.register(format!("p{i}"), Arc::new(ScriptedProvider::named("p")));
        }
        assert!(matches!(
            orchestrator.resolve(Some("ghost")),
            Err(AiError::ProviderNotFound(_))
        ));
    }

    #[test]
    fn resolve_with_no_default_fails() {
        let orchestrator = AiOrchestrator::new();
        assert!(matches!(
            orchestrator.resolve(None),
            Err(AiError::ProviderNotFound(_))
        ));
    }

    #[test]
    fn set_default_requires_registration() {
        let orchestrator = AiOrchestrator::new();
        assert!(matches!(
            orchestrator.set_default("nobody"),
            Err(AiError::ProviderNotFound(_))
        ));
    }

    #[test]
    fn overwrite_keeps_registration_position() {
        let orchestrator = AiOrchestrator::new();
        orchestrator.register("a", Arc::new(ScriptedProvider::named("a")));
        orchestrator.register("b", Arc::new(ScriptedProvider::named("b")));
        orchestrator.register("a", Arc::new(ScriptedProvider::named("a2")));
        assert_eq!(orchestrator.provider_names(), vec!["a", "b"]);
    }
}
