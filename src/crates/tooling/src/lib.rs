//! Shared helpers for the maestro workspace
//!
//! # Modules
//!
//! - `config` - Environment variable loading and the `ConfigBuilder` trait
//! - `logging` - Subscriber initialisation and timing helpers built on tracing

pub mod config;
pub mod logging;

use thiserror::Error;

/// Errors that can occur in the tooling crate
#[derive(Debug, Error)]
pub enum ToolingError {
    /// An environment variable was present but unusable
    #[error("Environment variable {key}: {reason}")]
    Env { key: String, reason: String },

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Logging could not be initialised
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result type for tooling operations
pub type Result<T> = std::result::Result<T, ToolingError>;

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
