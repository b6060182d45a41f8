/// Point-in-time view of a catalog
use crate::types::{Playlist, Track};
use serde::{Deserialize, Serialize};

/// Tracks and playlists read once at the start of a run.
///
/// The engine never re-reads a catalog mid-run; every decision is made against
/// this snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// All tracks in enumeration order
    pub tracks: Vec<Track>,

    /// All playlists, auto-generated ones included
    pub playlists: Vec<Playlist>,
}

impl CatalogSnapshot {
    /// Create a snapshot
    pub fn new(tracks: Vec<Track>, playlists: Vec<Playlist>) -> Self {
        Self { tracks, playlists }
    }

    /// Playlists eligible for synchronization (auto-generated ones filtered out)
    pub fn user_playlists(&self) -> impl Iterator<Item = &Playlist> {
        self.playlists.iter().filter(|playlist| !playlist.is_auto())
    }

    /// Find a user playlist by exact name
    pub fn user_playlist(&self, name: &str) -> Option<&Playlist> {
        self.user_playlists().find(|playlist| playlist.name == name)
    }
}
