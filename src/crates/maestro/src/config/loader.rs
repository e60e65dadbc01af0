//! Configuration loader
//!
//! Layers, later overriding earlier:
//! 1. Default values
//! 2. User-level config: ~/.maestro/maestro.toml
//! 3. Project-level config: ./.maestro/maestro.toml
//! 4. An explicit file (`--config`)
//! 5. `MAESTRO_*` environment variables
//!
//! Files are merged table-by-table before deserialising, so a later file
//! that sets one key leaves the rest of its section untouched.

use crate::config::schema::MaestroConfig;
use crate::error::{MaestroError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tooling::config::{ConfigBuilder, EnvReader};
use tracing::{debug, info};

/// Default prefix for environment overrides.
pub const ENV_PREFIX: &str = "MAESTRO_";

/// Loads [`MaestroConfig`] from the standard locations.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    user_config_path: Option<PathBuf>,
    project_config_path: Option<PathBuf>,
    explicit_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            user_config_path: dirs::home_dir().map(|home| home.join(".maestro").join("maestro.toml")),
            project_config_path: std::env::current_dir()
                .ok()
                .map(|cwd| cwd.join(".maestro").join("maestro.toml")),
            explicit_path: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Add an explicit file on top of the user and project files.
    ///
    /// Unlike those two, this one must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    pub fn with_user_path(mut self, path: Option<PathBuf>) -> Self {
        self.user_config_path = path;
        self
    }

    pub fn with_project_path(mut self, path: Option<PathBuf>) -> Self {
        self.project_config_path = path;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn user_config_path(&self) -> Option<&Path> {
        self.user_config_path.as_deref()
    }

    pub fn project_config_path(&self) -> Option<&Path> {
        self.project_config_path.as_deref()
    }

    /// Load and merge every layer.
    pub async fn load(&self) -> Result<MaestroConfig> {
        let mut merged = toml::Table::new();

        for path in [&self.user_config_path, &self.project_config_path]
            .into_iter()
            .flatten()
        {
            if !path.exists() {
                debug!(path = %path.display(), "Config file not found, skipping");
                continue;
            }
            merge_tables(&mut merged, read_table(path).await?);
            debug!(path = %path.display(), "Loaded config file");
        }

        if let Some(path) = &self.explicit_path {
            if !path.exists() {
                return Err(MaestroError::Configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            merge_tables(&mut merged, read_table(path).await?);
            debug!(path = %path.display(), "Loaded explicit config file");
        }

        let config: MaestroConfig = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| {
                MaestroError::Configuration(format!("Failed to parse config: {}", e))
            })?;

        let config = config.layered(&EnvReader::new(&self.env_prefix))?;

        info!(
            endpoint = %config.mopidy.endpoint,
            oracle = %config.oracle.provider,
            model = %config.oracle.model,
            "Configuration loaded"
        );
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_table(path: &Path) -> Result<toml::Table> {
    let content = fs::read_to_string(path).await.map_err(|e| {
        MaestroError::Configuration(format!("Failed to read {}: {}", path.display(), e))
    })?;

    content.parse::<toml::Table>().map_err(|e| {
        MaestroError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Recursively overlay `overlay` onto `base`. Nested tables merge; any
/// other value replaces.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
