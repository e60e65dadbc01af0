//! Command dispatcher
//!
//! One branch per [`Action`]. Every branch follows the same shape: an
//! `in_progress` status, the adapter calls, then exactly one user-facing
//! message and one terminal (`done = true`) status. Lookups go local library
//! first and remote video search second.

use crate::adapters::{MusicServer, VideoSearch};
use crate::events::{Event, EventSink, MessagesOnly};
use crate::intent::{Action, Intent, IntentParameters};
use crate::playlist::PlaylistRegistry;
use crate::track::Track;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How many local hits are named in the "now playing" message.
const LISTED_TRACKS: usize = 3;

/// Result of handling one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    /// The action that was actually carried out.
    pub action: Action,
    pub success: bool,
    /// The user-facing message that was emitted.
    pub message: String,
    /// Tracks handed to the music server, in queue order.
    pub played: Vec<Track>,
}

/// Emits the progress/terminal events for one branch and builds its outcome.
struct Report<'a> {
    sink: &'a dyn EventSink,
    action: Action,
}

impl Report<'_> {
    fn progress(&self, description: impl Into<String>) {
        self.sink.emit(Event::in_progress(description));
    }

    fn success(self, message: impl Into<String>, played: Vec<Track>) -> DispatchOutcome {
        let message = message.into();
        self.sink.emit(Event::message(message.clone()));
        self.sink.emit(Event::completed(message.clone()));
        DispatchOutcome {
            action: self.action,
            success: true,
            message,
            played,
        }
    }

    fn failure(self, message: impl Into<String>) -> DispatchOutcome {
        let message = message.into();
        self.sink.emit(Event::message(message.clone()));
        self.sink.emit(Event::failed(message.clone()));
        DispatchOutcome {
            action: self.action,
            success: false,
            message,
            played: Vec::new(),
        }
    }
}

/// Routes intents to the music server, video search and playlist registry.
pub struct Dispatcher {
    server: Arc<dyn MusicServer>,
    video: Arc<dyn VideoSearch>,
    playlists: Arc<PlaylistRegistry>,
    ui_mode: bool,
}

impl Dispatcher {
    pub fn new(
        server: Arc<dyn MusicServer>,
        video: Arc<dyn VideoSearch>,
        playlists: Arc<PlaylistRegistry>,
    ) -> Self {
        Self {
            server,
            video,
            playlists,
            ui_mode: true,
        }
    }

    /// With UI mode off only message events reach the sink.
    pub fn with_ui_mode(mut self, ui_mode: bool) -> Self {
        self.ui_mode = ui_mode;
        self
    }

    pub fn playlists(&self) -> &Arc<PlaylistRegistry> {
        &self.playlists
    }

    /// Carry out `intent`, reporting progress to `sink`.
    ///
    /// Never fails: adapter failures become a failure message plus an
    /// error-level terminal status.
    pub async fn dispatch(&self, intent: &Intent, sink: &dyn EventSink) -> DispatchOutcome {
        if self.ui_mode {
            self.run(intent, sink).await
        } else {
            self.run(intent, &MessagesOnly::new(sink)).await
        }
    }

    async fn run(&self, intent: &Intent, sink: &dyn EventSink) -> DispatchOutcome {
        let params = &intent.parameters;
        let report = Report {
            sink,
            action: intent.action.clone(),
        };
        debug!(action = %intent.action, "Dispatching intent");

        match &intent.action {
            Action::PlaySong => self.play_song(params, report).await,
            Action::PlayPlaylist => self.play_playlist(params, report).await,
            Action::AddToPlaylist => self.add_to_playlist(params, report).await,
            Action::CreatePlaylist => self.create_playlist(params, report).await,
            Action::ShowCurrentSong => self.show_current_song(report).await,
            Action::Pause => {
                report.progress("Pausing playback");
                if self.server.pause().await {
                    report.success("Playback paused.", Vec::new())
                } else {
                    report.failure("Failed to pause playback.")
                }
            }
            Action::Resume | Action::Play => {
                report.progress("Resuming playback");
                if self.server.resume().await {
                    report.success("Playback resumed.", Vec::new())
                } else {
                    report.failure("Failed to resume playback.")
                }
            }
            Action::Skip => {
                report.progress("Skipping track");
                if self.server.skip().await {
                    report.success("Skipped to next track.", Vec::new())
                } else {
                    report.failure("Failed to skip track.")
                }
            }
            Action::Unknown(raw) => {
                // Single-level fallback: search for the title, or the action text itself.
                let mut fallback = params.clone();
                if fallback.title.is_none() {
                    let text = raw.replace('_', " ").trim().to_string();
                    fallback.title = (!text.is_empty()).then_some(text);
                }
                info!(action = %raw, title = ?fallback.title, "Unrecognised action, searching instead");
                let report = Report {
                    sink,
                    action: Action::PlaySong,
                };
                self.play_song(&fallback, report).await
            }
        }
    }

    async fn play_song(&self, params: &IntentParameters, report: Report<'_>) -> DispatchOutcome {
        let query = params.song_query();
        if query.is_empty() {
            return report.failure("Please specify a song title or artist.");
        }

        report.progress(format!("Searching local library for '{}'", query));
        let local = self.server.search_local(&query).await;
        if !local.is_empty() {
            let names: Vec<&str> = local
                .iter()
                .take(LISTED_TRACKS)
                .map(|t| t.name.as_str())
                .collect();
            let message = format!("Now playing from local library: {}", names.join(", "));
            return self.start(local, message, report).await;
        }

        report.progress(format!("Searching YouTube for '{}'", query));
        let Some(top) = self.video.search(&query, false).await.into_iter().next() else {
            return report.failure(format!("No results found for '{}'.", query));
        };

        let message = format!("Now playing from YouTube: {}", top.display());
        self.start(vec![top], message, report).await
    }

    async fn play_playlist(&self, params: &IntentParameters, report: Report<'_>) -> DispatchOutcome {
        let query = params.playlist_query();
        if query.is_empty() {
            return report.failure("Please specify a playlist name.");
        }

        if let Some(playlist) = self.playlists.get(&query) {
            if playlist.tracks.is_empty() {
                debug!(playlist = %playlist.name, "Saved playlist is empty, searching instead");
            } else {
                report.progress(format!("Loading playlist '{}'", playlist.name));
                let message = format!(
                    "Now playing playlist '{}' ({} tracks).",
                    playlist.name,
                    playlist.tracks.len()
                );
                return self.start(playlist.tracks, message, report).await;
            }
        }

        report.progress(format!("Searching local library for playlist '{}'", query));
        let local = self.server.search_local(&query).await;
        if !local.is_empty() {
            let message = format!("Now playing playlist '{}' from local library.", query);
            return self.start(local, message, report).await;
        }

        report.progress(format!("Searching YouTube for playlist '{}'", query));
        let remote = self.video.search(&query, true).await;
        if remote.is_empty() {
            return report.failure(format!("No results found for '{}'.", query));
        }

        let message = format!(
            "Now playing playlist '{}' from YouTube ({} tracks).",
            query,
            remote.len()
        );
        self.start(remote, message, report).await
    }

    async fn create_playlist(&self, params: &IntentParameters, report: Report<'_>) -> DispatchOutcome {
        let Some(name) = params.playlist_name.clone().or_else(|| params.title.clone()) else {
            return report.failure("Please specify a playlist name.");
        };

        // Early out before the seed search; `create_with` below is the authoritative check.
        if self.playlists.contains(&name) {
            return report.failure(format!("Playlist '{}' already exists.", name));
        }

        let vibe = params.vibe_query();
        let seed = if vibe.is_empty() {
            Vec::new()
        } else {
            report.progress(format!("Finding tracks for '{}'", vibe));
            self.find_tracks(&vibe).await
        };

        let count = seed.len();
        if !self.playlists.create_with(&name, seed) {
            return report.failure(format!("Playlist '{}' already exists.", name));
        }
        info!(playlist = %name, tracks = count, "Created playlist");
        report.success(
            format!("Created playlist '{}' with {} tracks.", name, count),
            Vec::new(),
        )
    }

    async fn add_to_playlist(&self, params: &IntentParameters, report: Report<'_>) -> DispatchOutcome {
        let Some(playlist) = params.playlist_name.clone() else {
            return report.failure("Please specify a playlist name.");
        };

        let query = params.song_query();
        if query.is_empty() {
            return report.failure("Please specify a song title or artist.");
        }

        report.progress(format!("Finding '{}'", query));
        let Some(track) = self.find_tracks(&query).await.into_iter().next() else {
            return report.failure(format!("No results found for '{}'.", query));
        };

        let message = format!("Added '{}' to playlist '{}'.", track.display(), playlist);
        let len = self.playlists.append(&playlist, track);
        debug!(playlist = %playlist, len, "Appended track");
        report.success(message, Vec::new())
    }

    async fn show_current_song(&self, report: Report<'_>) -> DispatchOutcome {
        report.progress("Fetching current track");
        match self.server.current_track().await {
            Some(track) => report.success(format!("Now playing: {}", track.display()), Vec::new()),
            None => report.success("Nothing is playing.", Vec::new()),
        }
    }

    /// Local hits if any, otherwise remote video hits.
    async fn find_tracks(&self, query: &str) -> Vec<Track> {
        let local = self.server.search_local(query).await;
        if !local.is_empty() {
            return local;
        }
        self.video.search(query, false).await
    }

    async fn start(&self, tracks: Vec<Track>, message: String, report: Report<'_>) -> DispatchOutcome {
        report.progress(format!("Starting playback of {} tracks", tracks.len()));
        if self.server.play_tracks(&tracks).await {
            report.success(message, tracks)
        } else {
            warn!(tracks = tracks.len(), "Playback did not start");
            report.failure("Failed to start playback.")
        }
    }
}
