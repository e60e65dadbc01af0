//! Configuration management
//!
//! See [`ConfigLoader`] for the layering order and [`MaestroConfig`] for the
//! available keys.

mod loader;
mod schema;

pub use loader::{ConfigLoader, ENV_PREFIX};
pub use schema::{
    MaestroConfig, MopidyConfig, OracleConfig, OracleProvider, UiConfig, YouTubeConfig,
};
