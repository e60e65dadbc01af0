//! Common test utilities: recording fakes and throwaway HTTP servers
#![allow(dead_code)]

use async_trait::async_trait;
use llm::{ChatModel, ChatRequest, ChatResponse, LlmError, Message};
use maestro::{MusicServer, Track, VideoSearch};
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::net::TcpListener;

/// Calls observed by [`FakeServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerCall {
    SearchLocal(String),
    PlayTracks(Vec<Track>),
    Pause,
    Resume,
    Skip,
    CurrentTrack,
}

/// Music server that records every call and answers from fixed settings.
pub struct FakeServer {
    pub local: Vec<Track>,
    pub play_ok: bool,
    pub control_ok: bool,
    pub current: Option<Track>,
    calls: Mutex<Vec<ServerCall>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self {
            local: Vec::new(),
            play_ok: true,
            control_ok: true,
            current: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_local(mut self, tracks: Vec<Track>) -> Self {
        self.local = tracks;
        self
    }

    pub fn failing_playback(mut self) -> Self {
        self.play_ok = false;
        self
    }

    pub fn failing_controls(mut self) -> Self {
        self.control_ok = false;
        self
    }

    pub fn playing(mut self, track: Track) -> Self {
        self.current = Some(track);
        self
    }

    pub fn calls(&self) -> Vec<ServerCall> {
        self.calls.lock().clone()
    }

    /// Tracks handed to the most recent `play_tracks` call.
    pub fn last_played(&self) -> Option<Vec<Track>> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            ServerCall::PlayTracks(tracks) => Some(tracks.clone()),
            _ => None,
        })
    }

    fn record(&self, call: ServerCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl MusicServer for FakeServer {
    async fn search_local(&self, query: &str) -> Vec<Track> {
        self.record(ServerCall::SearchLocal(query.to_string()));
        self.local.clone()
    }

    async fn play_tracks(&self, tracks: &[Track]) -> bool {
        self.record(ServerCall::PlayTracks(tracks.to_vec()));
        self.play_ok
    }

    async fn pause(&self) -> bool {
        self.record(ServerCall::Pause);
        self.control_ok
    }

    async fn resume(&self) -> bool {
        self.record(ServerCall::Resume);
        self.control_ok
    }

    async fn skip(&self) -> bool {
        self.record(ServerCall::Skip);
        self.control_ok
    }

    async fn current_track(&self) -> Option<Track> {
        self.record(ServerCall::CurrentTrack);
        self.current.clone()
    }
}

/// Video search that records `(query, is_playlist)` pairs.
pub struct FakeVideo {
    pub videos: Vec<Track>,
    pub playlist: Vec<Track>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl FakeVideo {
    pub fn new() -> Self {
        Self {
            videos: Vec::new(),
            playlist: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_videos(mut self, tracks: Vec<Track>) -> Self {
        self.videos = tracks;
        self
    }

    pub fn with_playlist(mut self, tracks: Vec<Track>) -> Self {
        self.playlist = tracks;
        self
    }

    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl VideoSearch for FakeVideo {
    async fn search(&self, query: &str, is_playlist: bool) -> Vec<Track> {
        self.calls.lock().push((query.to_string(), is_playlist));
        if is_playlist {
            self.playlist.clone()
        } else {
            self.videos.clone()
        }
    }
}

/// Oracle that replays queued replies in order and records requests.
///
/// Once the queue is empty every further call fails.
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedOracle {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedOracle {
    async fn chat(&self, request: ChatRequest) -> llm::Result<ChatResponse> {
        self.requests.lock().push(request);
        let reply = self
            .replies
            .lock()
            .pop_front()
            .ok_or_else(|| LlmError::ProviderError("script exhausted".to_string()))?;

        Ok(ChatResponse {
            message: Message::assistant(reply),
            usage: None,
            model: "scripted".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn local_track(id: u32, name: &str, artist: &str) -> Track {
    Track::new(format!("local:track:{}", id), name, vec![artist.to_string()])
}

pub fn video_track(id: &str, name: &str, channel: &str) -> Track {
    Track::new(
        format!("{}{}", maestro::adapters::YOUTUBE_URI_PREFIX, id),
        name,
        vec![channel.to_string()],
    )
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_server(app: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    format!("http://{}", addr)
}
