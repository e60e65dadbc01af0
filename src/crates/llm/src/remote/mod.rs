//! Remote LLM provider implementations.
//!
//! - **OpenAI** - `/chat/completions`, also served by most self-hosted
//!   gateways

pub mod openai;

pub use openai::OpenAiClient;
