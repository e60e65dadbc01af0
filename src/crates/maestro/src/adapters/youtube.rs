//! YouTube Data API v3 search client.
//!
//! Video hits become tracks with a `yt:` URI that Mopidy-YouTube can play.
//! Playlist searches take the top playlist hit and expand it page by page.

use super::VideoSearch;
use crate::config::YouTubeConfig;
use crate::error::{MaestroError, Result};
use crate::track::Track;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use tooling::logging::timed;
use tracing::{debug, warn};

/// Prefix Mopidy-YouTube expects in front of a watch URL.
pub const YOUTUBE_URI_PREFIX: &str = "yt:https://www.youtube.com/watch?v=";

/// Items requested per playlist page (the API maximum).
const PLAYLIST_PAGE_SIZE: u32 = 50;

/// Search client for the YouTube Data API.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    base_url: String,
    api_key: Option<String>,
    max_results: u32,
    client: Client,
}

impl YouTubeClient {
    pub fn new(config: &YouTubeConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            MaestroError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            max_results: config.max_results,
            client,
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| MaestroError::Configuration("YouTube API key is not configured".into()))
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, resource);
        let response = timed(resource, self.client.get(&url).query(query).send()).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MaestroError::Transport(format!(
                "{} returned HTTP {}: {}",
                resource, status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| MaestroError::Parse(format!("{}: {}", resource, e)))
    }

    async fn search_videos(&self, query: &str) -> Result<Vec<Track>> {
        let key = self.api_key()?;
        let page: SearchResponse = self
            .get(
                "search",
                &[
                    ("part", "snippet".to_string()),
                    ("q", query.to_string()),
                    ("maxResults", self.max_results.to_string()),
                    ("key", key.to_string()),
                    ("type", "video".to_string()),
                ],
            )
            .await?;

        Ok(page
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                Some(video_track(&video_id, item.snippet.title, item.snippet.channel_title))
            })
            .collect())
    }

    async fn search_playlist(&self, query: &str) -> Result<Vec<Track>> {
        let key = self.api_key()?;
        let page: SearchResponse = self
            .get(
                "search",
                &[
                    ("part", "snippet".to_string()),
                    ("q", query.to_string()),
                    ("maxResults", "1".to_string()),
                    ("key", key.to_string()),
                    ("type", "playlist".to_string()),
                ],
            )
            .await?;

        let Some(playlist_id) = page.items.into_iter().find_map(|item| item.id.playlist_id) else {
            debug!(query, "No playlist matched");
            return Ok(Vec::new());
        };

        self.playlist_items(&playlist_id).await
    }

    /// Every video in a playlist, following `nextPageToken` until absent.
    ///
    /// Stops early if the API hands back any token it has already given.
    pub async fn playlist_items(&self, playlist_id: &str) -> Result<Vec<Track>> {
        let key = self.api_key()?;
        let mut tracks = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();
        let mut pages = 0usize;

        loop {
            let mut query = vec![
                ("part", "snippet".to_string()),
                ("playlistId", playlist_id.to_string()),
                ("maxResults", PLAYLIST_PAGE_SIZE.to_string()),
                ("key", key.to_string()),
            ];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let page: PlaylistItemsResponse = self.get("playlistItems", &query).await?;
            pages += 1;
            tracks.extend(page.items.into_iter().filter_map(playlist_item_track));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) if !seen_tokens.insert(token.clone()) => {
                    warn!(playlist_id, token = %token, pages, "Playlist page token repeated, stopping");
                    break;
                }
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(playlist_id, pages, tracks = tracks.len(), "Expanded playlist");
        Ok(tracks)
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search(&self, query: &str, is_playlist: bool) -> Vec<Track> {
        let result = if is_playlist {
            self.search_playlist(query).await
        } else {
            self.search_videos(query).await
        };

        match result {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(query, is_playlist, error = %e, "Remote search failed");
                Vec::new()
            }
        }
    }
}

fn video_track(video_id: &str, title: String, channel: Option<String>) -> Track {
    Track::new(
        format!("{}{}", YOUTUBE_URI_PREFIX, video_id),
        title,
        channel.into_iter().collect(),
    )
}

/// Deleted and private entries carry no video id and are skipped.
fn playlist_item_track(item: PlaylistItem) -> Option<Track> {
    let snippet = item.snippet;
    let video_id = snippet.resource_id.and_then(|r| r.video_id)?;
    let channel = snippet.video_owner_channel_title.or(snippet.channel_title);
    Some(video_track(&video_id, snippet.title, channel))
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
    playlist_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    channel_title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    #[serde(default)]
    snippet: PlaylistItemSnippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    #[serde(default)]
    title: String,
    channel_title: Option<String>,
    video_owner_channel_title: Option<String>,
    resource_id: Option<ResourceId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}
