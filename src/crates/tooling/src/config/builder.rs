//! Configuration builder trait
//!
//! Provides a common trait for configuration sections so every config in
//! the workspace layers the same way: start from a value (defaults or a
//! parsed file), overlay the environment, then validate.

use crate::config::EnvReader;
use crate::Result;

/// Trait for configuration sections that accept an environment overlay
///
/// # Example
///
/// ```rust,ignore
/// use tooling::config::{ConfigBuilder, EnvReader};
///
/// impl ConfigBuilder for PlayerConfig {
///     fn apply_env(&mut self, env: &EnvReader) -> tooling::Result<()> {
///         if let Some(endpoint) = env.string("ENDPOINT")? {
///             self.endpoint = endpoint;
///         }
///         Ok(())
///     }
/// }
///
/// let config = PlayerConfig::from_env_over_defaults("PLAYER_")?;
/// ```
pub trait ConfigBuilder: Default {
    /// Overwrite fields whose variables are present in `env`
    ///
    /// Absent variables must leave the field untouched.
    fn apply_env(&mut self, env: &EnvReader) -> Result<()>;

    /// Validate the configuration
    ///
    /// The default implementation accepts everything.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Overlay the environment on `self` and validate the result
    fn layered(mut self, env: &EnvReader) -> Result<Self> {
        self.apply_env(env)?;
        self.validate()?;
        Ok(self)
    }

    /// Defaults overlaid with `{prefix}*` variables, validated
    fn from_env_over_defaults(prefix: &str) -> Result<Self> {
        Self::default().layered(&EnvReader::new(prefix))
    }
}
