//! In-memory playlist registry
//!
//! Playlists built during a session live here for the lifetime of the
//! process and are lost on restart. The registry is an owned value handed to
//! the dispatcher, not a global. Names are matched case-insensitively after
//! trimming; the first spelling used is kept for display.

use crate::track::Track;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// A named, ordered list of tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub name: String,
    pub tracks: Vec<Track>,
}

/// Session-scoped playlist store.
#[derive(Debug, Default)]
pub struct PlaylistRegistry {
    playlists: RwLock<BTreeMap<String, Playlist>>,
}

impl PlaylistRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Create an empty playlist. Returns `false` if the name is taken.
    pub fn create(&self, name: &str) -> bool {
        self.create_with(name, Vec::new())
    }

    /// Create a playlist seeded with `tracks`. Returns `false` if the name
    /// is taken, leaving the existing playlist untouched.
    pub fn create_with(&self, name: &str, tracks: Vec<Track>) -> bool {
        let mut playlists = self.playlists.write();
        let key = Self::key(name);
        if playlists.contains_key(&key) {
            return false;
        }
        playlists.insert(
            key,
            Playlist {
                name: name.trim().to_string(),
                tracks,
            },
        );
        true
    }

    /// Append a track, creating the playlist if needed. Returns the new length.
    pub fn append(&self, name: &str, track: Track) -> usize {
        let mut playlists = self.playlists.write();
        let playlist = playlists.entry(Self::key(name)).or_insert_with(|| Playlist {
            name: name.trim().to_string(),
            tracks: Vec::new(),
        });
        playlist.tracks.push(track);
        playlist.tracks.len()
    }

    /// Copy of the named playlist.
    pub fn get(&self, name: &str) -> Option<Playlist> {
        self.playlists.read().get(&Self::key(name)).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.playlists.read().contains_key(&Self::key(name))
    }

    /// Display names, sorted case-insensitively.
    pub fn names(&self) -> Vec<String> {
        self.playlists.read().values().map(|p| p.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.playlists.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.read().is_empty()
    }
}
