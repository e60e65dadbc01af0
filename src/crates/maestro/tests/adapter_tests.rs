//! Real reqwest adapters against local fake Mopidy and YouTube servers

mod common;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use common::spawn_server;
use maestro::config::{MopidyConfig, YouTubeConfig};
use maestro::{MopidyClient, MusicServer, Track, VideoSearch, YouTubeClient};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// ===== Mopidy =====

#[derive(Default)]
struct RpcState {
    requests: Mutex<Vec<Value>>,
    http_failure: Option<&'static str>,
    rpc_error: Option<&'static str>,
    current: Value,
}

impl RpcState {
    fn methods(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|r| r["method"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

async fn rpc(State(state): State<Arc<RpcState>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.requests.lock().push(body.clone());
    let method = body["method"].as_str().unwrap_or_default();
    let id = body["id"].clone();

    if state.http_failure == Some(method) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "boom"})));
    }
    if state.rpc_error == Some(method) {
        return (
            StatusCode::OK,
            Json(json!({"jsonrpc": "2.0", "id": id, "error": {"code": -32601, "message": "Method not found"}})),
        );
    }

    let result = match method {
        "core.library.search" => json!([
            {
                "uri": "local:search",
                "tracks": [
                    {"uri": "local:track:1", "name": "So What", "artists": [{"name": "Miles Davis"}]},
                    {"uri": "tunein:station:s1", "name": "Jazz Radio", "artists": []}
                ]
            },
            {
                "uri": "spotify:search",
                "tracks": [
                    {"uri": "spotify:track:2", "name": "Blue in Green", "artists": [{"name": "Miles Davis"}, {"name": "Bill Evans"}]}
                ]
            }
        ]),
        "core.playback.get_current_track" => state.current.clone(),
        _ => Value::Null,
    };
    (StatusCode::OK, Json(json!({"jsonrpc": "2.0", "id": id, "result": result})))
}

async fn mopidy(state: RpcState) -> (Arc<RpcState>, MopidyClient) {
    let state = Arc::new(state);
    let app = Router::new()
        .route("/mopidy/rpc", post(rpc))
        .with_state(state.clone());
    let base = spawn_server(app).await;

    let config = MopidyConfig {
        endpoint: format!("{}/mopidy/rpc", base),
        ..MopidyConfig::default()
    };
    (state, MopidyClient::new(&config).unwrap())
}

#[tokio::test]
async fn test_search_local_flattens_and_filters_radio() {
    let (state, client) = mopidy(RpcState::default()).await;

    let tracks = client.search_local("miles davis").await;

    assert_eq!(
        tracks,
        vec![
            Track::new("local:track:1", "So What", vec!["Miles Davis".into()]),
            Track::new(
                "spotify:track:2",
                "Blue in Green",
                vec!["Miles Davis".into(), "Bill Evans".into()]
            ),
        ]
    );

    let requests = state.requests.lock();
    assert_eq!(requests[0]["jsonrpc"], "2.0");
    assert_eq!(requests[0]["method"], "core.library.search");
    assert_eq!(requests[0]["params"], json!({"any": ["miles davis"]}));
}

#[tokio::test]
async fn test_play_tracks_sequence() {
    let (state, client) = mopidy(RpcState::default()).await;
    let tracks = vec![
        Track::new("local:track:1", "A", vec![]),
        Track::new("local:track:2", "B", vec![]),
    ];

    assert!(client.play_tracks(&tracks).await);

    assert_eq!(
        state.methods(),
        vec!["core.tracklist.clear", "core.tracklist.add", "core.playback.play"]
    );
    let requests = state.requests.lock();
    assert_eq!(
        requests[1]["params"],
        json!({"uris": ["local:track:1", "local:track:2"]})
    );

    let ids: Vec<u64> = requests.iter().map(|r| r["id"].as_u64().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids not increasing: {:?}", ids);
}

#[tokio::test]
async fn test_play_tracks_enqueue_failure_stops_sequence() {
    let (state, client) = mopidy(RpcState {
        http_failure: Some("core.tracklist.add"),
        ..Default::default()
    })
    .await;

    let ok = client
        .play_tracks(&[Track::new("local:track:1", "A", vec![])])
        .await;

    assert!(!ok);
    assert_eq!(state.methods(), vec!["core.tracklist.clear", "core.tracklist.add"]);
}

#[tokio::test]
async fn test_rpc_error_object_is_failure() {
    let (_state, client) = mopidy(RpcState {
        rpc_error: Some("core.playback.pause"),
        ..Default::default()
    })
    .await;

    assert!(!client.pause().await);
    assert!(client.skip().await);

    let err = client.call("core.playback.pause", json!({})).await.unwrap_err();
    assert!(matches!(err, maestro::MaestroError::Rpc { code: -32601, .. }));
}

#[tokio::test]
async fn test_control_methods() {
    let (state, client) = mopidy(RpcState::default()).await;

    assert!(client.pause().await);
    assert!(client.resume().await);
    assert!(client.skip().await);

    assert_eq!(
        state.methods(),
        vec!["core.playback.pause", "core.playback.play", "core.playback.next"]
    );
}

#[tokio::test]
async fn test_current_track() {
    let (_state, client) = mopidy(RpcState {
        current: json!({"uri": "local:track:5", "name": "Naima", "artists": [{"name": "John Coltrane"}]}),
        ..Default::default()
    })
    .await;
    assert_eq!(
        client.current_track().await,
        Some(Track::new("local:track:5", "Naima", vec!["John Coltrane".into()]))
    );

    let (_state, idle) = mopidy(RpcState::default()).await;
    assert_eq!(idle.current_track().await, None);
}

#[tokio::test]
async fn test_unreachable_server_degrades() {
    let config = MopidyConfig {
        endpoint: "http://127.0.0.1:1/mopidy/rpc".to_string(),
        ..MopidyConfig::default()
    };
    let client = MopidyClient::new(&config).unwrap();

    assert!(client.search_local("anything").await.is_empty());
    assert!(!client.play_tracks(&[Track::new("local:track:1", "A", vec![])]).await);
    assert!(!client.pause().await);
    assert!(client.current_track().await.is_none());
}

// ===== YouTube =====

type Queries = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

fn playlist_page(start: usize, count: usize, next: Option<&str>) -> Value {
    let items: Vec<Value> = (start..start + count)
        .map(|i| {
            json!({
                "snippet": {
                    "title": format!("Track {}", i),
                    "channelTitle": "Curator",
                    "videoOwnerChannelTitle": format!("Artist {}", i),
                    "resourceId": {"kind": "youtube#video", "videoId": format!("vid{}", i)}
                }
            })
        })
        .collect();
    let mut page = json!({"items": items});
    if let Some(token) = next {
        page["nextPageToken"] = json!(token);
    }
    page
}

async fn search(
    State(queries): State<Queries>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    queries.lock().push(("search".to_string(), params.clone()));
    if params.get("key").map(String::as_str) != Some("test-key") {
        return (StatusCode::FORBIDDEN, Json(json!({"error": {"code": 403}})));
    }

    let body = match params.get("type").map(String::as_str) {
        Some("playlist") => json!({
            "items": [{"id": {"kind": "youtube#playlist", "playlistId": "PL123"},
                       "snippet": {"title": "Lofi Beats", "channelTitle": "Lofi Girl"}}]
        }),
        _ => json!({
            "items": [{"id": {"kind": "youtube#video", "videoId": "abc123"},
                       "snippet": {"title": "Jazz Mix", "channelTitle": "JazzChannel"}}]
        }),
    };
    (StatusCode::OK, Json(body))
}

async fn playlist_items(
    State(queries): State<Queries>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    queries.lock().push(("playlistItems".to_string(), params.clone()));
    if params.get("playlistId").map(String::as_str) == Some("PLCYCLE") {
        let page = match params.get("pageToken").map(String::as_str) {
            None => playlist_page(0, 10, Some("A")),
            Some("A") => playlist_page(10, 10, Some("B")),
            _ => playlist_page(20, 10, Some("A")),
        };
        return Json(page);
    }

    let page = match params.get("pageToken").map(String::as_str) {
        None => playlist_page(0, 50, Some("page2")),
        Some("page2") => playlist_page(50, 50, Some("page3")),
        _ => playlist_page(100, 10, None),
    };
    Json(page)
}

async fn youtube(api_key: Option<&str>) -> (Queries, YouTubeClient) {
    let queries: Queries = Arc::default();
    let app = Router::new()
        .route("/search", get(search))
        .route("/playlistItems", get(playlist_items))
        .with_state(queries.clone());
    let base = spawn_server(app).await;

    let config = YouTubeConfig {
        api_key: api_key.map(str::to_string),
        base_url: base,
        max_results: 5,
        timeout_secs: None,
    };
    (queries, YouTubeClient::new(&config).unwrap())
}

#[tokio::test]
async fn test_video_search() {
    let (queries, client) = youtube(Some("test-key")).await;

    let tracks = client.search("some jazz", false).await;

    assert_eq!(
        tracks,
        vec![Track::new(
            "yt:https://www.youtube.com/watch?v=abc123",
            "Jazz Mix",
            vec!["JazzChannel".into()]
        )]
    );

    let queries = queries.lock();
    let (resource, params) = &queries[0];
    assert_eq!(resource, "search");
    assert_eq!(params["part"], "snippet");
    assert_eq!(params["q"], "some jazz");
    assert_eq!(params["maxResults"], "5");
    assert_eq!(params["type"], "video");
}

#[tokio::test]
async fn test_playlist_pagination_collects_every_page() {
    let (queries, client) = youtube(Some("test-key")).await;

    let tracks = client.search("lofi", true).await;

    assert_eq!(tracks.len(), 110);
    assert_eq!(tracks[0].name, "Track 0");
    assert_eq!(tracks[0].artists, vec!["Artist 0"]);
    assert_eq!(tracks[109].uri, "yt:https://www.youtube.com/watch?v=vid109");

    let queries = queries.lock();
    assert_eq!(queries.len(), 4);
    assert_eq!(queries[0].1["type"], "playlist");
    assert_eq!(queries[0].1["maxResults"], "1");

    let pages: Vec<&HashMap<String, String>> = queries[1..].iter().map(|(_, p)| p).collect();
    assert!(pages.iter().all(|p| p["playlistId"] == "PL123" && p["maxResults"] == "50"));
    assert!(!pages[0].contains_key("pageToken"));
    assert_eq!(pages[1]["pageToken"], "page2");
    assert_eq!(pages[2]["pageToken"], "page3");
}

#[tokio::test]
async fn test_playlist_pagination_stops_on_token_cycle() {
    let (queries, client) = youtube(Some("test-key")).await;

    let tracks = tokio::time::timeout(Duration::from_secs(5), client.playlist_items("PLCYCLE"))
        .await
        .expect("pagination should stop when a token comes back")
        .unwrap();

    assert_eq!(tracks.len(), 30);
    assert_eq!(tracks[29].name, "Track 29");

    let tokens: Vec<Option<String>> = queries
        .lock()
        .iter()
        .map(|(_, p)| p.get("pageToken").cloned())
        .collect();
    assert_eq!(tokens, vec![None, Some("A".to_string()), Some("B".to_string())]);
}

#[tokio::test]
async fn test_non_success_status_is_empty() {
    let (queries, client) = youtube(Some("wrong-key")).await;

    assert!(client.search("some jazz", false).await.is_empty());
    assert!(client.search("lofi", true).await.is_empty());
    assert_eq!(queries.lock().len(), 2);
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let (queries, client) = youtube(None).await;

    assert!(client.search("some jazz", false).await.is_empty());
    assert!(queries.lock().is_empty());
}
