//! Normalized playable item

use serde::{Deserialize, Serialize};

/// A playable item as returned by any search adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<String>,
}

impl Track {
    pub fn new(uri: impl Into<String>, name: impl Into<String>, artists: Vec<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            artists,
        }
    }

    /// `"Name by A, B"`, or just the name when no artist is known.
    pub fn display(&self) -> String {
        if self.artists.is_empty() {
            self.name.clone()
        } else {
            format!("{} by {}", self.name, self.artists.join(", "))
        }
    }

    /// True when the URI starts with any of `schemes` (e.g. `"tunein:"`).
    pub fn has_scheme(&self, schemes: &[String]) -> bool {
        schemes.iter().any(|s| self.uri.starts_with(s.as_str()))
    }
}
