//! In-memory catalog shared by the engine integration tests
#![allow(dead_code)]

use plexsync_core::{
    CatalogError, CatalogReader, CatalogWriter, Playlist, Result, StarRating, Track, TrackId,
};
use std::collections::HashSet;

/// Catalog backed by plain vectors. Writes mutate the vectors in place.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    pub name: String,
    pub tracks: Vec<Track>,
    pub playlists: Vec<Playlist>,
    /// Reads fail when set
    pub unreadable: bool,
    /// Writes touching these tracks fail
    pub failing_tracks: HashSet<TrackId>,
    /// Number of successful writes
    pub writes: usize,
}

impl InMemoryCatalog {
    pub fn new(name: &str, tracks: Vec<Track>) -> Self {
        Self {
            name: name.to_string(),
            tracks,
            ..Self::default()
        }
    }

    pub fn with_playlists(mut self, playlists: Vec<Playlist>) -> Self {
        self.playlists = playlists;
        self
    }

    pub fn track(&self, id: &str) -> &Track {
        self.tracks
            .iter()
            .find(|track| track.id.as_str() == id)
            .unwrap_or_else(|| panic!("no track {id}"))
    }

    pub fn playlist(&self, name: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|playlist| playlist.name == name)
    }

    fn check_writable(&self, id: &TrackId) -> Result<()> {
        if self.failing_tracks.contains(id) {
            return Err(CatalogError::backend(format!("write refused for {id}")));
        }
        if !self.tracks.iter().any(|track| &track.id == id) {
            return Err(CatalogError::not_found("Track", id.as_str()));
        }
        Ok(())
    }
}

impl CatalogReader for InMemoryCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_tracks(&self) -> Result<Vec<Track>> {
        if self.unreadable {
            return Err(CatalogError::backend("catalog offline"));
        }
        Ok(self.tracks.clone())
    }

    fn list_playlists(&self) -> Result<Vec<Playlist>> {
        if self.unreadable {
            return Err(CatalogError::backend("catalog offline"));
        }
        Ok(self.playlists.clone())
    }
}

impl CatalogWriter for InMemoryCatalog {
    fn write_rating(&mut self, id: &TrackId, rating: StarRating) -> Result<()> {
        self.check_writable(id)?;
        if let Some(track) = self.tracks.iter_mut().find(|track| &track.id == id) {
            track.rating = Some(rating);
        }
        self.writes += 1;
        Ok(())
    }

    fn add_to_playlist(&mut self, name: &str, id: &TrackId) -> Result<()> {
        self.check_writable(id)?;
        match self.playlists.iter_mut().find(|playlist| playlist.name == name) {
            Some(playlist) => {
                if !playlist.contains(id) {
                    playlist.track_ids.push(id.clone());
                }
            }
            None => self.playlists.push(Playlist::new(name).with_tracks([id.clone()])),
        }
        self.writes += 1;
        Ok(())
    }

    fn remove_from_playlist(&mut self, name: &str, id: &TrackId) -> Result<()> {
        self.check_writable(id)?;
        let playlist = self
            .playlists
            .iter_mut()
            .find(|playlist| playlist.name == name)
            .ok_or_else(|| CatalogError::not_found("Playlist", name))?;
        playlist.track_ids.retain(|track| track != id);
        self.writes += 1;
        Ok(())
    }
}

pub fn stars(value: f64) -> StarRating {
    StarRating::from_stars(value).unwrap()
}

pub fn track(id: &str, title: &str, artist: &str, seconds: u64) -> Track {
    Track::new(TrackId::new(id), title)
        .with_artist(artist)
        .with_duration_secs(seconds)
}

/// A small local library and its slightly differently tagged server copy
pub fn sample_catalogs() -> (InMemoryCatalog, InMemoryCatalog) {
    let local = InMemoryCatalog::new(
        "local",
        vec![
            track("l1", "Let It Be", "The Beatles", 243).with_rating(stars(4.0)),
            track("l2", "Hey Jude", "The Beatles", 431).with_rating(stars(5.0)),
            track("l3", "Bohemian Rhapsody", "Queen", 354).with_rating(stars(4.5)),
            track("l4", "Unreleased Demo", "Nobody", 120).with_rating(stars(3.0)),
            Track::new(TrackId::new("l5"), "").with_artist("Untitled"),
        ],
    )
    .with_playlists(vec![
        Playlist::new("Favourites").with_tracks(["l1", "l3"]),
        Playlist::new("Sixties").with_tracks(["l1", "l2"]),
        Playlist::auto("Top Rated").with_tracks(["l2", "l3"]),
    ]);

    let remote = InMemoryCatalog::new(
        "remote",
        vec![
            track("r1", "let it be", "Beatles, The", 243),
            track("r2", "Let It Be (Remastered)", "The Beatles", 240),
            track("r3", "Hey Jude", "The Beatles", 431).with_rating(stars(5.0)),
            track("r4", "Bohemian Rhapsody", "Queen", 355).with_rating(stars(2.0)),
            track("r5", "Under Pressure", "Queen", 248).with_rating(stars(3.5)),
        ],
    )
    .with_playlists(vec![
        Playlist::new("Favourites").with_tracks(["r5"]),
        Playlist::auto("Recently Played").with_tracks(["r1"]),
    ]);

    (local, remote)
}
