//! Intent resolution
//!
//! Resolution is two-staged. [`classify`] is a pure lookup against a fixed
//! table of one-word commands; only text that misses the table is sent to
//! the oracle. The oracle reply is scanned for its first balanced JSON
//! object, parsed, alias-normalised and turned into an [`Intent`].
//!
//! [`IntentResolver::resolve`] is total: every failure after classification
//! degrades to [`Intent::fallback`], which searches for the user's raw text.

use crate::error::{MaestroError, Result};
use crate::intent::{Action, Intent};
use llm::{ChatModel, ChatRequest, Message};
use std::sync::Arc;
use tooling::logging::timed;
use tracing::{debug, info, warn};

/// Instruction sent ahead of every user message.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = r#"You control a music player. Classify the user's request and reply with a single JSON object and nothing else:

{"action": "<action>", "parameters": {"title": "...", "artist": "...", "playlist_name": "...", "mood": "...", "genre": "..."}}

<action> is one of:
- play_song: play a specific song, artist, or style ("title" and/or "artist")
- play_playlist: play a playlist or album ("title" or "playlist_name")
- add_to_playlist: add a song to a named playlist ("title", "artist", "playlist_name")
- create_playlist: create a named playlist, optionally for a "mood" or "genre"
- show_current_song: say what is playing now
- pause, resume, play, skip: playback controls (no parameters)

Omit parameters you do not know. For a style or vibe such as "some jazz", put the words in "title"."#;

/// Outcome of the keyword table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The text is a one-word command; no oracle call needed.
    DirectCommand(Action),
    /// The text must be interpreted by the oracle.
    NeedsOracle(String),
}

/// Look `text` up in the one-word command table.
///
/// Input is trimmed, lowercased and stripped of trailing `.`/`!` before the
/// lookup. Anything else is returned untouched for the oracle.
pub fn classify(text: &str) -> Classification {
    let normalized = text
        .trim()
        .trim_end_matches(['.', '!'])
        .trim()
        .to_lowercase();

    let action = match normalized.as_str() {
        "stop" | "pause" => Action::Pause,
        "next" | "skip" => Action::Skip,
        "resume" | "continue" | "unpause" => Action::Resume,
        "play" | "start" => Action::Play,
        _ => return Classification::NeedsOracle(text.to_string()),
    };
    Classification::DirectCommand(action)
}

/// Return the first `{...}` substring of `text` that parses as a JSON object.
///
/// Each opening brace is tried in turn. A candidate that is never closed, or
/// that is balanced but not valid JSON (prose such as `{placeholders}`), is
/// skipped and the scan resumes at the next `{`. Braces inside JSON string
/// literals (including escaped quotes) do not count towards the balance.
pub fn extract_json_object(text: &str) -> Option<&str> {
    text.match_indices('{')
        .filter_map(|(start, _)| balanced_object_at(text, start))
        .find(|candidate| {
            serde_json::from_str::<serde_json::Value>(candidate)
                .map(|value| value.is_object())
                .unwrap_or(false)
        })
}

/// The balanced `{...}` starting at byte `start`, if it is ever closed.
fn balanced_object_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse an oracle reply into an intent, without the fallback.
///
/// Fails with [`MaestroError::Resolution`] when no brace-delimited substring
/// of the reply is a valid JSON object.
pub fn parse_oracle_reply(reply: &str, original_text: &str) -> Result<Intent> {
    let json = extract_json_object(reply).ok_or_else(|| {
        MaestroError::Resolution("oracle reply contains no valid JSON object".to_string())
    })?;

    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| MaestroError::Resolution(format!("malformed JSON from oracle: {}", e)))?;

    Intent::from_oracle_value(value, original_text)
}

/// Turns free text into an [`Intent`], consulting the oracle when needed.
#[derive(Clone)]
pub struct IntentResolver {
    oracle: Arc<dyn ChatModel>,
    instruction: String,
    temperature: f32,
}

impl IntentResolver {
    /// Create a resolver with the default instruction and temperature 0.
    pub fn new(oracle: Arc<dyn ChatModel>) -> Self {
        Self {
            oracle,
            instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            temperature: 0.0,
        }
    }

    /// Replace the system instruction.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Set the sampling temperature for oracle calls.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Resolve `text`. Never fails.
    ///
    /// Blank text goes straight to the fallback without an oracle call.
    pub async fn resolve(&self, text: &str) -> Intent {
        if text.trim().is_empty() {
            debug!("Blank request, skipping oracle");
            return Intent::fallback(text);
        }

        match classify(text) {
            Classification::DirectCommand(action) => {
                debug!(%action, "Matched direct command");
                Intent::bare(action)
            }
            Classification::NeedsOracle(text) => match self.resolve_with_oracle(&text).await {
                Ok(intent) => {
                    info!(action = %intent.action, "Oracle resolved intent");
                    intent
                }
                Err(e) => {
                    warn!(error = %e, "Intent resolution failed, searching for raw text");
                    Intent::fallback(&text)
                }
            },
        }
    }

    async fn resolve_with_oracle(&self, text: &str) -> Result<Intent> {
        let request = ChatRequest::new(vec![
            Message::system(self.instruction.clone()),
            Message::human(text),
        ])
        .with_temperature(self.temperature);

        let response = timed("oracle.chat", self.oracle.chat(request)).await?;
        debug!(model = %response.model, reply = %response.text(), "Oracle replied");

        parse_oracle_reply(response.text(), text)
    }
}
