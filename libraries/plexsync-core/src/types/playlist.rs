/// Playlist domain types
use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// Whether a playlist is maintained by the user or generated by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistKind {
    /// Created and edited by the user
    User,
    /// Generated from rules (smart playlist); never synchronized
    Auto,
}

/// Playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Playlist name, used to pair playlists across catalogs
    pub name: String,

    /// Member tracks in playlist order (catalog-local ids)
    pub track_ids: Vec<TrackId>,

    /// User-created or auto-generated
    pub kind: PlaylistKind,
}

impl Playlist {
    /// Create an empty user playlist
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            track_ids: Vec::new(),
            kind: PlaylistKind::User,
        }
    }

    /// Create an empty auto-generated playlist
    pub fn auto(name: impl Into<String>) -> Self {
        Self {
            kind: PlaylistKind::Auto,
            ..Self::new(name)
        }
    }

    /// Set the member tracks
    pub fn with_tracks<I, T>(mut self, tracks: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TrackId>,
    {
        self.track_ids = tracks.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the playlist was generated by the player
    pub fn is_auto(&self) -> bool {
        self.kind == PlaylistKind::Auto
    }

    /// Whether the track is a member of this playlist
    pub fn contains(&self, track: &TrackId) -> bool {
        self.track_ids.contains(track)
    }

    /// Number of member tracks
    pub fn len(&self) -> usize {
        self.track_ids.len()
    }

    /// Whether the playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }
}
