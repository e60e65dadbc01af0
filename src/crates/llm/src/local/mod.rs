//! Local LLM provider implementations.
//!
//! - **Ollama** - `/api/chat` on a local Ollama daemon

pub mod ollama;

pub use ollama::OllamaClient;
