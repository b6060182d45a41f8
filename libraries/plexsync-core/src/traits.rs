/// Collaborator traits implemented by every catalog backend
///
/// The sync engine never talks to a media player or a server directly. Backends
/// (local audio files, a Plex server, in-memory test doubles) implement these traits
/// and are handed to the engine as trait objects.
use crate::error::Result;
use crate::rating::StarRating;
use crate::types::{CatalogSnapshot, Playlist, Track, TrackId};

/// Read access to a catalog.
///
/// Ratings are returned in the half-star domain; backends decode their native
/// representation at this boundary.
pub trait CatalogReader {
    /// Human readable name used in logs and reports
    fn name(&self) -> &str;

    /// Enumerate every track in the catalog
    ///
    /// # Errors
    /// Returns an error if the catalog cannot be read
    fn list_tracks(&self) -> Result<Vec<Track>>;

    /// Enumerate every playlist, including auto-generated ones
    ///
    /// # Errors
    /// Returns an error if the catalog cannot be read
    fn list_playlists(&self) -> Result<Vec<Playlist>>;

    /// Take an immutable snapshot of tracks and playlists
    fn snapshot(&self) -> Result<CatalogSnapshot> {
        Ok(CatalogSnapshot::new(self.list_tracks()?, self.list_playlists()?))
    }
}

/// Write access to a catalog.
///
/// Ratings are passed in the half-star domain; backends encode to their native
/// representation at this boundary.
pub trait CatalogWriter {
    /// Set the rating of a track
    ///
    /// # Errors
    /// Returns an error if the track does not exist or the write fails
    fn write_rating(&mut self, track: &TrackId, rating: StarRating) -> Result<()>;

    /// Add a track to the named playlist.
    ///
    /// Backends create the playlist when no playlist with this name exists yet.
    fn add_to_playlist(&mut self, playlist: &str, track: &TrackId) -> Result<()>;

    /// Remove a track from the named playlist
    fn remove_from_playlist(&mut self, playlist: &str, track: &TrackId) -> Result<()>;
}

/// A catalog that can be both read and written
pub trait Catalog: CatalogReader + CatalogWriter {}

impl<T: CatalogReader + CatalogWriter> Catalog for T {}
