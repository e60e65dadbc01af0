//! Chat-completion clients for maestro.
//!
//! The intent resolver treats a language model as an opaque oracle: it sends
//! a fixed instruction plus the user's words and reads back text. This crate
//! provides that seam as the [`ChatModel`] trait and two implementations.
//!
//! # Local Providers
//!
//! - **Ollama** - local LLM runner, no API key required
//!
//! # Remote Providers
//!
//! - **OpenAI** - and any server speaking the OpenAI `/chat/completions`
//!   dialect (vLLM, LiteLLM, llama.cpp server, ...)
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use llm::remote::OpenAiClient;
//! use llm::{ChatModel, ChatRequest, Message, RemoteLlmConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteLlmConfig::from_env(
//!         "OPENAI_API_KEY",
//!         "https://api.openai.com/v1",
//!         "gpt-4o-mini",
//!     )?;
//!     let client = OpenAiClient::new(config)?;
//!
//!     let request = ChatRequest::new(vec![
//!         Message::system("Reply with JSON only."),
//!         Message::human("play some jazz"),
//!     ])
//!     .with_temperature(0.0);
//!
//!     let response = client.chat(request).await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod config;
pub mod error;

#[cfg(feature = "local")]
pub mod local;

#[cfg(feature = "remote")]
pub mod remote;

// Re-export commonly used types
pub use chat::{ChatModel, ChatRequest, ChatResponse, Message, MessageRole, UsageMetadata};
pub use config::{LocalLlmConfig, RemoteLlmConfig};
pub use error::{LlmError, Result};
