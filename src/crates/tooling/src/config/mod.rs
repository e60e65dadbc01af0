//! Configuration management utilities
//!
//! Layered configuration in the workspace follows one pattern: a `Default`
//! value, overlaid by files, overlaid by prefixed environment variables.
//!
//! - [`EnvReader`] reads `{PREFIX}{NAME}` variables with typed parsing
//! - [`ConfigBuilder`] gives config sections a consistent overlay/validate API
//!
//! # Example
//!
//! ```rust,ignore
//! use tooling::config::{ConfigBuilder, EnvReader};
//!
//! #[derive(Default)]
//! struct ServerConfig {
//!     pub endpoint: String,
//!     pub verbose: bool,
//! }
//!
//! impl ConfigBuilder for ServerConfig {
//!     fn apply_env(&mut self, env: &EnvReader) -> tooling::Result<()> {
//!         if let Some(endpoint) = env.string("ENDPOINT")? {
//!             self.endpoint = endpoint;
//!         }
//!         if let Some(verbose) = env.flag("VERBOSE")? {
//!             self.verbose = verbose;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let config = ServerConfig::from_env_over_defaults("SERVER_")?;
//! ```

mod builder;
mod env;

pub use builder::ConfigBuilder;
pub use env::EnvReader;
