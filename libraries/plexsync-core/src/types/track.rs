/// Track domain type
use crate::rating::StarRating;
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A track as enumerated by one catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Catalog-local identifier
    pub id: TrackId,

    /// Track title (may be empty when the source has no title tag)
    pub title: String,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Track number
    pub track_number: Option<u32>,

    /// Track duration in milliseconds
    pub duration_ms: Option<u64>,

    /// Current rating, `None` when unrated
    pub rating: Option<StarRating>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(id: TrackId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: None,
            album: None,
            track_number: None,
            duration_ms: None,
            rating: None,
        }
    }

    /// Set the artist
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Set the album
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// Set the track number
    pub fn with_track_number(mut self, track_number: u32) -> Self {
        self.track_number = Some(track_number);
        self
    }

    /// Set the duration in whole seconds
    pub fn with_duration_secs(mut self, seconds: u64) -> Self {
        self.duration_ms = Some(seconds * 1000);
        self
    }

    /// Set the rating
    pub fn with_rating(mut self, rating: StarRating) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }
}

/// Formats as `artist - album - title`, leaving out missing parts
impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [self.artist.as_deref(), self.album.as_deref(), Some(self.title.as_str())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        write!(f, "{}", parts.join(" - "))
    }
}
