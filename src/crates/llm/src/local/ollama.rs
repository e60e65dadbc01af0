//! Ollama client implementation.
//!
//! Talks to `{base_url}/api/chat` on a local Ollama daemon with streaming
//! disabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::local::OllamaClient;
//! use llm::{ChatModel, ChatRequest, LocalLlmConfig, Message};
//!
//! let client = OllamaClient::new(LocalLlmConfig::new("http://localhost:11434", "llama3"))?;
//! let response = client.chat(ChatRequest::new(vec![Message::human("Hello!")])).await?;
//! ```

use crate::chat::{ChatModel, ChatRequest, ChatResponse, Message, MessageRole, UsageMetadata};
use crate::config::LocalLlmConfig;
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Ollama client for local LLM inference.
#[derive(Clone)]
pub struct OllamaClient {
    config: LocalLlmConfig,
    client: Client,
}

impl OllamaClient {
    /// Create a new Ollama client with the given configuration.
    pub fn new(config: LocalLlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Check if the Ollama server is running.
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn build_request(&self, request: &ChatRequest) -> OllamaRequest {
        let mut options = HashMap::new();
        if let Some(temp) = request.temperature {
            options.insert("temperature", serde_json::Value::from(temp));
        }
        if let Some(max_tokens) = request.max_tokens {
            options.insert("num_predict", serde_json::Value::from(max_tokens));
        }

        OllamaRequest {
            model: self.config.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            stream: false,
            options: if options.is_empty() { None } else { Some(options) },
        }
    }

    fn convert_response(&self, ollama_resp: OllamaResponse) -> ChatResponse {
        let usage = match (ollama_resp.prompt_eval_count, ollama_resp.eval_count) {
            (None, None) => None,
            (input, output) => Some(UsageMetadata::new(input.unwrap_or(0), output.unwrap_or(0))),
        };

        ChatResponse {
            message: Message::new(MessageRole::Assistant, ollama_resp.message.content),
            usage,
            model: ollama_resp.model,
        }
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/api/chat", self.config.base_url);
        let req_body = self.build_request(&request);

        debug!(model = %self.config.model, "Sending Ollama chat request");

        let response = self.client.post(&url).json(&req_body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status("Ollama", status, error_text));
        }

        let ollama_resp: OllamaResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(self.convert_response(ollama_resp))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Ollama API types
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<HashMap<&'static str, serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    message: OllamaMessage,
    #[serde(default)]
    prompt_eval_count: Option<usize>,
    #[serde(default)]
    eval_count: Option<usize>,
}
