//! Mopidy JSON-RPC client.

use super::MusicServer;
use crate::config::MopidyConfig;
use crate::error::{MaestroError, Result};
use crate::track::Track;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tooling::logging::timed;
use tracing::{debug, warn};

/// Talks to a Mopidy server over JSON-RPC 2.0 (HTTP POST).
#[derive(Debug)]
pub struct MopidyClient {
    endpoint: String,
    blocked_schemes: Vec<String>,
    client: Client,
    next_id: AtomicU64,
}

impl MopidyClient {
    pub fn new(config: &MopidyConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            MaestroError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            blocked_schemes: config.blocked_schemes.clone(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue one JSON-RPC call and return its `result`.
    ///
    /// Non-2xx statuses are transport errors; an `error` member is
    /// [`MaestroError::Rpc`].
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response = timed(method, self.client.post(&self.endpoint).json(&request).send()).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MaestroError::Transport(format!(
                "{} returned HTTP {}: {}",
                method, status, body
            )));
        }

        let reply: RpcResponse = response
            .json()
            .await
            .map_err(|e| MaestroError::Parse(format!("{}: {}", method, e)))?;

        if let Some(error) = reply.error {
            return Err(MaestroError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        debug!(method, id, "RPC call succeeded");
        Ok(reply.result.unwrap_or(Value::Null))
    }

    /// Run a command-style call, converting any failure to `false`.
    async fn command(&self, method: &str) -> bool {
        match self.call(method, json!({})).await {
            Ok(_) => true,
            Err(e) => {
                warn!(method, error = %e, "Music server command failed");
                false
            }
        }
    }

    async fn replace_queue_and_play(&self, tracks: &[Track]) -> Result<()> {
        let uris: Vec<&str> = tracks.iter().map(|t| t.uri.as_str()).collect();
        self.call("core.tracklist.clear", json!({})).await?;
        self.call("core.tracklist.add", json!({ "uris": uris })).await?;
        self.call("core.playback.play", json!({})).await?;
        Ok(())
    }
}

#[async_trait]
impl MusicServer for MopidyClient {
    async fn search_local(&self, query: &str) -> Vec<Track> {
        match self
            .call("core.library.search", json!({ "any": [query] }))
            .await
        {
            Ok(result) => {
                let tracks = parse_search_results(&result, &self.blocked_schemes);
                debug!(query, found = tracks.len(), "Local search finished");
                tracks
            }
            Err(e) => {
                warn!(query, error = %e, "Local search failed");
                Vec::new()
            }
        }
    }

    async fn play_tracks(&self, tracks: &[Track]) -> bool {
        if tracks.is_empty() {
            warn!("Refusing to start playback of an empty queue");
            return false;
        }
        match self.replace_queue_and_play(tracks).await {
            Ok(()) => true,
            Err(e) => {
                warn!(tracks = tracks.len(), error = %e, "Failed to start playback");
                false
            }
        }
    }

    async fn pause(&self) -> bool {
        self.command("core.playback.pause").await
    }

    async fn resume(&self) -> bool {
        self.command("core.playback.play").await
    }

    async fn skip(&self) -> bool {
        self.command("core.playback.next").await
    }

    async fn current_track(&self) -> Option<Track> {
        match self.call("core.playback.get_current_track", json!({})).await {
            Ok(result) => parse_track(&result),
            Err(e) => {
                warn!(error = %e, "Failed to fetch current track");
                None
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Flatten `[{tracks: [...]}, ...]` into tracks, dropping blocked schemes.
fn parse_search_results(result: &Value, blocked_schemes: &[String]) -> Vec<Track> {
    result
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|search_result| search_result.get("tracks").and_then(Value::as_array))
        .flatten()
        .filter_map(parse_track)
        .filter(|track| !track.has_scheme(blocked_schemes))
        .collect()
}

/// A Mopidy track model. `null` or a missing `uri` yields `None`.
fn parse_track(value: &Value) -> Option<Track> {
    let uri = value.get("uri")?.as_str()?;
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(uri);
    let artists = value
        .get("artists")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|artist| artist.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    Some(Track::new(uri, name, artists))
}
