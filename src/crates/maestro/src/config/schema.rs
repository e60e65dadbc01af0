//! Configuration schema
//!
//! Every section is `#[serde(default)]`, so a file only needs the keys it
//! changes.

use crate::resolver::DEFAULT_SYSTEM_INSTRUCTION;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tooling::config::{ConfigBuilder, EnvReader};
use tooling::logging::mask_secret;
use tooling::ToolingError;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaestroConfig {
    pub mopidy: MopidyConfig,
    pub youtube: YouTubeConfig,
    pub oracle: OracleConfig,
    pub ui: UiConfig,
}

impl MaestroConfig {
    /// Copy with every secret masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.youtube.api_key = copy.youtube.api_key.as_deref().map(mask_secret);
        copy.oracle.api_key = copy.oracle.api_key.as_deref().map(mask_secret);
        copy
    }
}

impl ConfigBuilder for MaestroConfig {
    fn apply_env(&mut self, env: &EnvReader) -> tooling::Result<()> {
        self.mopidy.apply_env(&env.nested("MOPIDY_"))?;
        self.youtube.apply_env(&env.nested("YOUTUBE_"))?;
        self.oracle.apply_env(&env.nested("ORACLE_"))?;
        if let Some(ui_mode) = env.flag("UI_MODE")? {
            self.ui.ui_mode = ui_mode;
        }
        Ok(())
    }
}

/// Music server (Mopidy JSON-RPC) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MopidyConfig {
    pub endpoint: String,
    /// URI prefixes excluded from local search results.
    pub blocked_schemes: Vec<String>,
    /// Per-request timeout. Unset means the transport default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for MopidyConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:6680/mopidy/rpc".to_string(),
            blocked_schemes: vec!["tunein:".to_string()],
            timeout_secs: None,
        }
    }
}

impl MopidyConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl ConfigBuilder for MopidyConfig {
    fn apply_env(&mut self, env: &EnvReader) -> tooling::Result<()> {
        if let Some(endpoint) = env.string("ENDPOINT")? {
            self.endpoint = endpoint;
        }
        if let Some(schemes) = env.list("BLOCKED_SCHEMES")? {
            self.blocked_schemes = schemes;
        }
        if let Some(timeout) = env.parse("TIMEOUT_SECS")? {
            self.timeout_secs = Some(timeout);
        }
        Ok(())
    }
}

/// Video search (YouTube Data API v3) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// Missing key is not an error here; searches just come back empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            max_results: 5,
            timeout_secs: None,
        }
    }
}

impl YouTubeConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl ConfigBuilder for YouTubeConfig {
    fn apply_env(&mut self, env: &EnvReader) -> tooling::Result<()> {
        if let Some(api_key) = env.string("API_KEY")? {
            self.api_key = Some(api_key);
        }
        if let Some(base_url) = env.string("BASE_URL")? {
            self.base_url = base_url;
        }
        if let Some(max_results) = env.parse("MAX_RESULTS")? {
            self.max_results = max_results;
        }
        if let Some(timeout) = env.parse("TIMEOUT_SECS")? {
            self.timeout_secs = Some(timeout);
        }
        Ok(())
    }
}

/// Which chat-completion backend serves as the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleProvider {
    /// OpenAI or any gateway speaking its chat-completions dialect
    #[default]
    OpenAi,
    Ollama,
}

impl fmt::Display for OracleProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleProvider::OpenAi => write!(f, "openai"),
            OracleProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl FromStr for OracleProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(OracleProvider::OpenAi),
            "ollama" => Ok(OracleProvider::Ollama),
            other => Err(format!("unknown oracle provider '{}'", other)),
        }
    }
}

/// Intent oracle settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub provider: OracleProvider,
    /// Defaults per provider when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub temperature: f32,
    pub system_instruction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: OracleProvider::OpenAi,
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            temperature: 0.0,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            timeout_secs: None,
        }
    }
}

impl OracleConfig {
    pub fn effective_base_url(&self) -> &str {
        match (&self.base_url, self.provider) {
            (Some(url), _) => url,
            (None, OracleProvider::OpenAi) => "https://api.openai.com/v1",
            (None, OracleProvider::Ollama) => "http://localhost:11434",
        }
    }
}

impl ConfigBuilder for OracleConfig {
    fn apply_env(&mut self, env: &EnvReader) -> tooling::Result<()> {
        if let Some(provider) = env.string("PROVIDER")? {
            self.provider = provider.parse().map_err(|reason| ToolingError::Env {
                key: env.key("PROVIDER"),
                reason,
            })?;
        }
        if let Some(base_url) = env.string("BASE_URL")? {
            self.base_url = Some(base_url);
        }
        if let Some(model) = env.string("MODEL")? {
            self.model = model;
        }
        if let Some(api_key) = env.string("API_KEY")? {
            self.api_key = Some(api_key);
        }
        if let Some(temperature) = env.parse("TEMPERATURE")? {
            self.temperature = temperature;
        }
        if let Some(instruction) = env.string("SYSTEM_INSTRUCTION")? {
            self.system_instruction = instruction;
        }
        if let Some(timeout) = env.parse("TIMEOUT_SECS")? {
            self.timeout_secs = Some(timeout);
        }
        Ok(())
    }
}

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// When false, status events are suppressed and only messages are emitted.
    pub ui_mode: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { ui_mode: true }
    }
}
