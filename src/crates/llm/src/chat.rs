//! Provider-agnostic chat types and the [`ChatModel`] trait.
//!
//! Implementations convert [`Message`]s to their wire format, make one HTTP
//! round trip and convert the reply back. Nothing here streams, retries or
//! calls tools: the oracle is a single request/response exchange.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    #[serde(rename = "user")]
    Human,
    Assistant,
}

impl MessageRole {
    /// Role name as used by OpenAI-style APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::Human => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Human, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// A request to a chat model.
///
/// ```rust
/// use llm::{ChatRequest, Message};
///
/// let request = ChatRequest::new(vec![Message::human("pause")])
///     .with_temperature(0.0)
///     .with_max_tokens(256);
/// assert_eq!(request.temperature, Some(0.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the number of generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Token accounting reported by the provider, when it reports any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageMetadata {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl UsageMetadata {
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total_tokens(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

/// A completed chat response.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub message: Message,
    pub usage: Option<UsageMetadata>,
    /// Model that actually served the request, as reported by the provider.
    pub model: String,
}

impl ChatResponse {
    /// Text of the assistant reply.
    pub fn text(&self) -> &str {
        &self.message.content
    }
}

/// Core trait for chat-based language models.
///
/// Implementations must be `Send + Sync`; share them as `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a complete chat response from messages.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Model identifier requests are sent to.
    fn model_name(&self) -> &str;
}
