//! Prefixed environment variable loading
//!
//! Every accessor distinguishes "absent" (`Ok(None)`) from "present but
//! unusable" (`Err`), so a typo in a variable's value surfaces instead of
//! silently falling back to a default.

use crate::{Result, ToolingError};
use std::env;
use std::str::FromStr;

/// Reads `{prefix}{NAME}` environment variables.
#[derive(Debug, Clone)]
pub struct EnvReader {
    prefix: String,
}

impl EnvReader {
    /// Create a reader for the given prefix (e.g. `"MAESTRO_"`).
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Full variable name for `name`, uppercased and prefixed.
    ///
    /// ```rust
    /// use tooling::config::EnvReader;
    ///
    /// let env = EnvReader::new("MAESTRO_");
    /// assert_eq!(env.key("oracle_model"), "MAESTRO_ORACLE_MODEL");
    /// ```
    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name.to_uppercase())
    }

    /// Reader for a nested section, e.g. `MAESTRO_` + `MOPIDY_`.
    ///
    /// ```rust
    /// use tooling::config::EnvReader;
    ///
    /// let env = EnvReader::new("MAESTRO_").nested("mopidy_");
    /// assert_eq!(env.key("endpoint"), "MAESTRO_MOPIDY_ENDPOINT");
    /// ```
    pub fn nested(&self, segment: &str) -> EnvReader {
        EnvReader::new(self.key(segment))
    }

    /// Raw string value. Empty values count as absent.
    pub fn string(&self, name: &str) -> Result<Option<String>> {
        let key = self.key(name);
        match env::var(&key) {
            Ok(val) if val.trim().is_empty() => Ok(None),
            Ok(val) => Ok(Some(val)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(ToolingError::Env {
                key,
                reason: "contains invalid UTF-8".to_string(),
            }),
        }
    }

    /// String value with a default.
    pub fn string_or(&self, name: &str, default: impl Into<String>) -> Result<String> {
        Ok(self.string(name)?.unwrap_or_else(|| default.into()))
    }

    /// Parsed value.
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.string(name)? {
            Some(val) => val.trim().parse::<T>().map(Some).map_err(|e| ToolingError::Env {
                key: self.key(name),
                reason: format!("failed to parse {:?}: {}", val, e),
            }),
            None => Ok(None),
        }
    }

    /// Boolean value.
    ///
    /// Accepts `true/1/yes/on` and `false/0/no/off`, case-insensitively.
    pub fn flag(&self, name: &str) -> Result<Option<bool>> {
        match self.string(name)? {
            Some(val) => match val.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(ToolingError::Env {
                    key: self.key(name),
                    reason: format!("invalid boolean {:?}", val),
                }),
            },
            None => Ok(None),
        }
    }

    /// Comma-separated list; surrounding whitespace and empty items are dropped.
    pub fn list(&self, name: &str) -> Result<Option<Vec<String>>> {
        Ok(self.string(name)?.map(|val| {
            val.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        }))
    }
}
