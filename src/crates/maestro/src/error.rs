//! Error types for maestro
//!
//! Most of these never reach the user: adapters convert them to empty or
//! `false` sentinels and the resolver converts them to its fallback intent.
//! They exist so the conversion points can log *why*.

use thiserror::Error;

/// Result type alias for maestro operations
pub type Result<T> = std::result::Result<T, MaestroError>;

/// Main error type for maestro operations
#[derive(Debug, Error)]
pub enum MaestroError {
    /// Network failure or non-success HTTP status
    #[error("Transport error: {0}")]
    Transport(String),

    /// The music server answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// A remote payload did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Required configuration is missing or unreadable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The oracle reply could not be turned into an intent
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// The oracle call itself failed
    #[error("Oracle error: {0}")]
    Oracle(#[from] llm::LlmError),

    /// A chat turn arrived with no messages
    #[error("Conversation contains no messages")]
    EmptyConversation,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for MaestroError {
    fn from(err: reqwest::Error) -> Self {
        MaestroError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for MaestroError {
    fn from(err: serde_json::Error) -> Self {
        MaestroError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for MaestroError {
    fn from(err: toml::de::Error) -> Self {
        MaestroError::Configuration(err.to_string())
    }
}

impl From<tooling::ToolingError> for MaestroError {
    fn from(err: tooling::ToolingError) -> Self {
        MaestroError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = MaestroError::Rpc {
            code: -32601,
            message: "Method not found".into(),
        };
        assert_eq!(err.to_string(), "RPC error -32601: Method not found");
        assert_eq!(
            MaestroError::EmptyConversation.to_string(),
            "Conversation contains no messages"
        );
    }

    #[test]
    fn test_from_serde() {
        let err: MaestroError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, MaestroError::Parse(_)));
    }

    #[test]
    fn test_from_tooling() {
        let err: MaestroError = tooling::ToolingError::Invalid("bad".into()).into();
        assert!(matches!(err, MaestroError::Configuration(_)));
    }
}
