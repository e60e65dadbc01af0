//! Remote service adapters
//!
//! Each adapter method is one (or a short fixed sequence of) HTTP round
//! trips. Failures never propagate: they are logged and reported as an empty
//! result, `false` or `None`, and each call is attempted exactly once.
//!
//! The traits are the seam the dispatcher depends on, so tests can swap in
//! recording fakes.

mod mopidy;
mod youtube;

pub use mopidy::MopidyClient;
pub use youtube::{YouTubeClient, YOUTUBE_URI_PREFIX};

use crate::track::Track;
use async_trait::async_trait;

/// Control surface of the music server.
#[async_trait]
pub trait MusicServer: Send + Sync {
    /// Search the local library. Blocked URI schemes are filtered out.
    async fn search_local(&self, query: &str) -> Vec<Track>;

    /// Replace the queue with `tracks` and start playback.
    ///
    /// Not atomic: if a later step fails the earlier ones stay applied.
    async fn play_tracks(&self, tracks: &[Track]) -> bool;

    async fn pause(&self) -> bool;

    async fn resume(&self) -> bool;

    async fn skip(&self) -> bool;

    /// The track currently playing, if any.
    async fn current_track(&self) -> Option<Track>;
}

/// Remote video search.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Search for videos, or when `is_playlist` is set, find the best
    /// matching playlist and return all of its items in order.
    async fn search(&self, query: &str, is_playlist: bool) -> Vec<Track>;
}
