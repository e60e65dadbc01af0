//! Intent model and alias normalisation
//!
//! An [`Intent`] is the `{action, parameters}` pair that drives dispatch.
//! Oracle replies are loose JSON, so before an intent is built the raw object
//! goes through [`normalize_aliases`], which folds the spellings models
//! actually produce (`type`, `query`, bare `mood`, `"album"`, ...) into the
//! canonical shape.

use crate::error::{MaestroError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    PlaySong,
    PlayPlaylist,
    AddToPlaylist,
    CreatePlaylist,
    ShowCurrentSong,
    Pause,
    Resume,
    Play,
    Skip,
    /// Anything else, with the raw action string kept for the dispatcher's
    /// search fallback.
    Unknown(String),
}

impl Action {
    /// Parse a canonical action name. Unrecognised names become `Unknown`.
    pub fn parse(name: &str) -> Self {
        match name {
            "play_song" => Action::PlaySong,
            "play_playlist" => Action::PlayPlaylist,
            "add_to_playlist" => Action::AddToPlaylist,
            "create_playlist" => Action::CreatePlaylist,
            "show_current_song" => Action::ShowCurrentSong,
            "pause" => Action::Pause,
            "resume" => Action::Resume,
            "play" => Action::Play,
            "skip" => Action::Skip,
            other => Action::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Action::PlaySong => "play_song",
            Action::PlayPlaylist => "play_playlist",
            Action::AddToPlaylist => "add_to_playlist",
            Action::CreatePlaylist => "create_playlist",
            Action::ShowCurrentSong => "show_current_song",
            Action::Pause => "pause",
            Action::Resume => "resume",
            Action::Play => "play",
            Action::Skip => "skip",
            Action::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Action {
    fn from(name: String) -> Self {
        Action::parse(&name)
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.as_str().to_string()
    }
}

/// Optional slots an intent may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl IntentParameters {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `"{title} {artist}"` trimmed; empty when neither is set.
    pub fn song_query(&self) -> String {
        join_words(&[self.title.as_deref(), self.artist.as_deref()])
    }

    /// `title`, falling back to `playlist_name`.
    pub fn playlist_query(&self) -> String {
        self.title
            .as_deref()
            .or(self.playlist_name.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    /// `"{mood} {genre}"` trimmed; empty when neither is set.
    pub fn vibe_query(&self) -> String {
        join_words(&[self.mood.as_deref(), self.genre.as_deref()])
    }

    fn from_object(params: &Map<String, Value>) -> Self {
        Self {
            title: param_string(params.get("title")),
            artist: param_string(params.get("artist")),
            playlist_name: param_string(params.get("playlist_name")),
            mood: param_string(params.get("mood")),
            genre: param_string(params.get("genre")),
        }
    }
}

/// A resolved request. Always structurally complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub action: Action,
    #[serde(default)]
    pub parameters: IntentParameters,
}

impl Intent {
    pub fn new(action: Action, parameters: IntentParameters) -> Self {
        Self { action, parameters }
    }

    /// A parameterless intent, as produced by the keyword table.
    pub fn bare(action: Action) -> Self {
        Self::new(action, IntentParameters::default())
    }

    /// The fallback for anything unresolvable: search for the raw text.
    pub fn fallback(original_text: &str) -> Self {
        Self::new(
            Action::PlaySong,
            IntentParameters::with_title(original_text.trim()),
        )
    }

    /// Build an intent from a raw oracle object.
    ///
    /// The object is alias-normalised first. A missing (or non-string)
    /// action yields [`Intent::fallback`] for `original_text`.
    pub fn from_oracle_value(value: Value, original_text: &str) -> Result<Self> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(MaestroError::Resolution(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let normalized = normalize_aliases(object);

        let action = match normalized.get("action") {
            Some(Value::String(action)) if !action.is_empty() => Action::parse(action),
            _ => return Ok(Self::fallback(original_text)),
        };

        let parameters = match normalized.get("parameters") {
            Some(Value::Object(params)) => IntentParameters::from_object(params),
            _ => IntentParameters::default(),
        };

        Ok(Self::new(action, parameters))
    }
}

/// Parameter keys that models sometimes emit at the top level.
const BARE_PARAMETER_KEYS: [&str; 5] = ["title", "artist", "playlist_name", "mood", "genre"];

/// Alternate parameter spellings and the canonical key they fold into.
const PARAMETER_ALIASES: [(&str, &str); 4] = [
    ("query", "title"),
    ("song", "title"),
    ("track", "title"),
    ("playlist", "playlist_name"),
];

/// Fold field and action aliases into the canonical intent shape.
///
/// - `type` becomes `action` when `action` is absent
/// - top-level `query` and the bare parameter keys move into `parameters`
/// - `parameters.query` (and a few siblings) become `parameters.title`
/// - action values are lowercased, spaces and hyphens become underscores,
///   and `playlist`/`album` → `play_playlist`, `song` → `play_song`,
///   `stop` → `pause`
///
/// The function is idempotent: a normalised object normalises to itself.
/// A canonical key that is already set always wins over an alias.
pub fn normalize_aliases(mut object: Map<String, Value>) -> Map<String, Value> {
    if !object.contains_key("action") {
        if let Some(kind) = object.remove("type") {
            object.insert("action".to_string(), kind);
        }
    }

    if let Some(Value::String(action)) = object.get_mut("action") {
        *action = canonical_action(action);
    }

    let mut params = match object.remove("parameters") {
        Some(Value::Object(params)) => params,
        _ => Map::new(),
    };

    for (alias, canonical) in PARAMETER_ALIASES {
        if let Some(value) = params.remove(alias) {
            params.entry(canonical).or_insert(value);
        }
    }

    if let Some(query) = object.remove("query") {
        params.entry("title").or_insert(query);
    }

    for key in BARE_PARAMETER_KEYS {
        if let Some(value) = object.remove(key) {
            params.entry(key).or_insert(value);
        }
    }

    object.insert("parameters".to_string(), Value::Object(params));
    object
}

fn canonical_action(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect();

    match cleaned.as_str() {
        "playlist" | "album" => "play_playlist".to_string(),
        "song" => "play_song".to_string(),
        "stop" => "pause".to_string(),
        _ => cleaned,
    }
}

fn param_string(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| param_string(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn join_words(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_action_round_trip_names() {
        for name in [
            "play_song",
            "play_playlist",
            "add_to_playlist",
            "create_playlist",
            "show_current_song",
            "pause",
            "resume",
            "play",
            "skip",
        ] {
            let action = Action::parse(name);
            assert!(!matches!(action, Action::Unknown(_)), "{} parsed as unknown", name);
            assert_eq!(action.as_str(), name);
        }
        assert_eq!(Action::parse("dance"), Action::Unknown("dance".into()));
    }

    #[test]
    fn test_type_becomes_action() {
        let normalized = normalize_aliases(object(json!({"type": "song", "query": "Blue in Green"})));
        assert_eq!(normalized["action"], "play_song");
        assert_eq!(normalized["parameters"]["title"], "Blue in Green");
        assert!(normalized.get("type").is_none());
        assert!(normalized.get("query").is_none());
    }

    #[test]
    fn test_action_wins_over_type() {
        let normalized = normalize_aliases(object(json!({"action": "skip", "type": "song"})));
        assert_eq!(normalized["action"], "skip");
    }

    #[test]
    fn test_action_aliases() {
        for (raw, expected) in [
            ("playlist", "play_playlist"),
            ("Album", "play_playlist"),
            ("song", "play_song"),
            ("STOP", "pause"),
            ("play song", "play_song"),
            ("show-current-song", "show_current_song"),
        ] {
            let normalized = normalize_aliases(object(json!({ "action": raw })));
            assert_eq!(normalized["action"], expected, "alias {}", raw);
        }
    }

    #[test]
    fn test_bare_mood_and_genre_move_into_parameters() {
        let normalized = normalize_aliases(object(json!({
            "action": "play_song",
            "mood": "chill",
            "genre": "jazz"
        })));
        assert_eq!(normalized["parameters"], json!({"mood": "chill", "genre": "jazz"}));
    }

    #[test]
    fn test_canonical_parameter_wins_over_alias() {
        let normalized = normalize_aliases(object(json!({
            "action": "play_song",
            "query": "ignored",
            "parameters": {"title": "kept", "query": "also ignored"}
        })));
        assert_eq!(normalized["parameters"], json!({"title": "kept"}));
    }

    #[test]
    fn test_non_object_parameters_become_empty() {
        let normalized = normalize_aliases(object(json!({"action": "pause", "parameters": "none"})));
        assert_eq!(normalized["parameters"], json!({}));
    }

    #[test]
    fn test_from_oracle_value_full() {
        let intent = Intent::from_oracle_value(
            json!({"action": "play_song", "parameters": {"title": " So What ", "artist": "Miles Davis"}}),
            "play so what",
        )
        .unwrap();
        assert_eq!(intent.action, Action::PlaySong);
        assert_eq!(intent.parameters.title.as_deref(), Some("So What"));
        assert_eq!(intent.parameters.song_query(), "So What Miles Davis");
    }

    #[test]
    fn test_from_oracle_value_missing_action_falls_back() {
        let intent = Intent::from_oracle_value(json!({"parameters": {"title": "x"}}), "  hum something  ").unwrap();
        assert_eq!(intent, Intent::fallback("hum something"));
        assert_eq!(intent.parameters.title.as_deref(), Some("hum something"));
    }

    #[test]
    fn test_from_oracle_value_non_string_action_falls_back() {
        let intent = Intent::from_oracle_value(json!({"action": 7}), "seven").unwrap();
        assert_eq!(intent, Intent::fallback("seven"));
    }

    #[test]
    fn test_from_oracle_value_missing_parameters() {
        let intent = Intent::from_oracle_value(json!({"action": "show_current_song"}), "what is this").unwrap();
        assert_eq!(intent, Intent::bare(Action::ShowCurrentSong));
    }

    #[test]
    fn test_from_oracle_value_rejects_non_object() {
        assert!(Intent::from_oracle_value(json!(["pause"]), "pause").is_err());
    }

    #[test]
    fn test_param_string_coercion() {
        let params = IntentParameters::from_object(&object(json!({
            "title": 1999,
            "artist": ["Prince", "The Revolution"],
            "mood": null,
            "genre": ""
        })));
        assert_eq!(params.title.as_deref(), Some("1999"));
        assert_eq!(params.artist.as_deref(), Some("Prince, The Revolution"));
        assert!(params.mood.is_none());
        assert!(params.genre.is_none());
    }

    #[test]
    fn test_queries() {
        let params = IntentParameters {
            playlist_name: Some("Road Trip".into()),
            mood: Some("upbeat".into()),
            ..Default::default()
        };
        assert_eq!(params.song_query(), "");
        assert_eq!(params.playlist_query(), "Road Trip");
        assert_eq!(params.vibe_query(), "upbeat");
        assert!(!params.is_empty());
        assert!(IntentParameters::default().is_empty());
    }

    #[test]
    fn test_intent_serialization() {
        let intent = Intent::new(Action::Pause, IntentParameters::default());
        assert_eq!(
            serde_json::to_value(&intent).unwrap(),
            json!({"action": "pause", "parameters": {}})
        );

        let parsed: Intent = serde_json::from_value(json!({"action": "dance"})).unwrap();
        assert_eq!(parsed.action, Action::Unknown("dance".into()));
    }
}
