//! Chat-turn router
//!
//! [`Maestro`] ties the resolver and the dispatcher together and owns the
//! session's playlist registry. It is what the CLI (or any embedding chat
//! front end) talks to.

use crate::adapters::{MopidyClient, MusicServer, VideoSearch, YouTubeClient};
use crate::config::{MaestroConfig, OracleConfig, OracleProvider};
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::error::{MaestroError, Result};
use crate::events::EventSink;
use crate::intent::Intent;
use crate::playlist::PlaylistRegistry;
use crate::resolver::IntentResolver;
use llm::local::OllamaClient;
use llm::remote::OpenAiClient;
use llm::{ChatModel, LocalLlmConfig, RemoteLlmConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// One message of the conversation handed to [`Maestro::handle_turn`].
pub use llm::Message as ChatMessage;

/// Resolves and dispatches chat turns.
pub struct Maestro {
    resolver: IntentResolver,
    dispatcher: Dispatcher,
}

impl Maestro {
    pub fn new(resolver: IntentResolver, dispatcher: Dispatcher) -> Self {
        Self {
            resolver,
            dispatcher,
        }
    }

    /// Wire up the real Mopidy, YouTube and oracle clients from `config`.
    pub fn from_config(config: &MaestroConfig) -> Result<Self> {
        let server: Arc<dyn MusicServer> = Arc::new(MopidyClient::new(&config.mopidy)?);
        let video: Arc<dyn VideoSearch> = Arc::new(YouTubeClient::new(&config.youtube)?);
        let oracle = build_oracle(&config.oracle)?;

        if config.youtube.api_key.is_none() {
            warn!("No YouTube API key configured; remote search will return nothing");
        }

        let resolver = IntentResolver::new(oracle)
            .with_instruction(config.oracle.system_instruction.clone())
            .with_temperature(config.oracle.temperature);
        let dispatcher = Dispatcher::new(server, video, Arc::new(PlaylistRegistry::new()))
            .with_ui_mode(config.ui.ui_mode);

        info!(
            mopidy = %config.mopidy.endpoint,
            oracle = %config.oracle.provider,
            ui_mode = config.ui.ui_mode,
            "Maestro ready"
        );
        Ok(Self::new(resolver, dispatcher))
    }

    pub fn resolver(&self) -> &IntentResolver {
        &self.resolver
    }

    pub fn playlists(&self) -> &Arc<PlaylistRegistry> {
        self.dispatcher.playlists()
    }

    /// Resolve free text without acting on it.
    pub async fn resolve(&self, text: &str) -> Intent {
        self.resolver.resolve(text).await
    }

    /// Handle one chat turn. Only the last message's content is used.
    pub async fn handle_turn(
        &self,
        conversation: &[ChatMessage],
        sink: &dyn EventSink,
    ) -> Result<DispatchOutcome> {
        let last = conversation.last().ok_or(MaestroError::EmptyConversation)?;
        Ok(self.handle_text(&last.content, sink).await)
    }

    /// Resolve and dispatch a single request.
    pub async fn handle_text(&self, text: &str, sink: &dyn EventSink) -> DispatchOutcome {
        let intent = self.resolver.resolve(text).await;
        self.dispatcher.dispatch(&intent, sink).await
    }
}

/// Build the configured chat-completion client.
pub fn build_oracle(config: &OracleConfig) -> Result<Arc<dyn ChatModel>> {
    let base_url = config.effective_base_url().to_string();
    let timeout = config.timeout_secs.map(Duration::from_secs);

    let oracle: Arc<dyn ChatModel> = match config.provider {
        OracleProvider::OpenAi => {
            let api_key = config.api_key.clone().unwrap_or_else(|| {
                warn!("No oracle API key configured; free-text requests will fall back to search");
                String::new()
            });
            let mut remote = RemoteLlmConfig::new(api_key, base_url, config.model.clone());
            if let Some(timeout) = timeout {
                remote = remote.with_timeout(timeout);
            }
            Arc::new(OpenAiClient::new(remote)?)
        }
        OracleProvider::Ollama => {
            let mut local = LocalLlmConfig::new(base_url, config.model.clone());
            if let Some(timeout) = timeout {
                local = local.with_timeout(timeout);
            }
            Arc::new(OllamaClient::new(local)?)
        }
    };

    Ok(oracle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_oracle_providers() {
        let mut config = OracleConfig::default();
        config.api_key = Some("sk-test".to_string());
        assert_eq!(build_oracle(&config).unwrap().model_name(), "gpt-4o-mini");

        config.provider = OracleProvider::Ollama;
        config.model = "llama3".to_string();
        assert_eq!(build_oracle(&config).unwrap().model_name(), "llama3");
    }

    #[test]
    fn test_from_config_defaults() {
        let maestro = Maestro::from_config(&MaestroConfig::default()).unwrap();
        assert!(maestro.playlists().is_empty());
    }
}
