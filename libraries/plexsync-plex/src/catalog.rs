//! Blocking catalog over one Plex music library.

use crate::auth::PlexAuthClient;
use crate::client::PlexClient;
use crate::error::Result;
use crate::types::{LibrarySection, PlexConfig, PlexTrack};
use plexsync_core::{CatalogReader, CatalogWriter, Playlist, StarRating, Track, TrackId};
use std::collections::HashMap;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

/// Catalog backed by a Plex Media Server.
///
/// Track ids are Plex `ratingKey`s. Smart playlists are reported as auto playlists
/// without members. The catalog owns a single-threaded runtime and blocks on every
/// request, so it must not be used from inside an async context.
pub struct PlexCatalog {
    name: String,
    runtime: Runtime,
    client: PlexClient,
    section: LibrarySection,
    machine_identifier: String,
    /// Title to ratingKey of user playlists, loaded on first playlist write
    playlist_keys: Option<HashMap<String, String>>,
}

impl PlexCatalog {
    /// Connect with the token from `config` and resolve the music library.
    pub fn connect(config: PlexConfig) -> Result<Self> {
        let runtime = new_runtime()?;
        Self::connect_on(runtime, config)
    }

    /// Sign in to plex.tv first, then connect with the returned token.
    pub fn sign_in(config: PlexConfig, username: &str, password: &str) -> Result<Self> {
        let runtime = new_runtime()?;
        let auth = PlexAuthClient::new(config.client_identifier.clone())?;
        let user = runtime.block_on(auth.sign_in(username, password))?;

        Self::connect_on(runtime, config.with_token(user.auth_token))
    }

    fn connect_on(runtime: Runtime, config: PlexConfig) -> Result<Self> {
        let client = PlexClient::new(config.clone())?;

        let (identity, section) = runtime.block_on(async {
            let identity = client.identity().await?;
            let section = client.music_section(config.section.as_deref()).await?;
            Result::Ok((identity, section))
        })?;

        info!(
            server = %client.url(),
            section = %section.title,
            "Using Plex music library"
        );

        Ok(Self {
            name: format!("Plex library '{}' ({})", section.title, client.url()),
            runtime,
            client,
            section,
            machine_identifier: identity.machine_identifier,
            playlist_keys: None,
        })
    }

    /// The music library this catalog reads
    pub fn section(&self) -> &LibrarySection {
        &self.section
    }

    fn track_uri(&self, track: &TrackId) -> String {
        PlexClient::library_uri(&self.machine_identifier, track.as_str())
    }

    fn playlist_keys(&mut self) -> Result<&mut HashMap<String, String>> {
        if self.playlist_keys.is_none() {
            let playlists = self.runtime.block_on(self.client.playlists())?;
            let mut keys = HashMap::new();
            for playlist in playlists.into_iter().filter(|p| !p.smart) {
                keys.entry(playlist.title).or_insert(playlist.rating_key);
            }
            self.playlist_keys = Some(keys);
        }

        Ok(self.playlist_keys.get_or_insert_with(HashMap::new))
    }
}

fn new_runtime() -> Result<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}

/// Map a Plex track to the catalog domain. A 0 user rating means unrated.
fn to_track(plex: PlexTrack) -> Track {
    Track {
        id: TrackId::new(plex.rating_key),
        title: plex.title,
        artist: plex.grandparent_title,
        album: plex.parent_title,
        track_number: plex.index,
        duration_ms: plex.duration,
        rating: plex
            .user_rating
            .and_then(StarRating::from_ten_point)
            .filter(|rating| !rating.is_zero()),
    }
}

impl CatalogReader for PlexCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_tracks(&self) -> plexsync_core::Result<Vec<Track>> {
        let tracks = self.runtime.block_on(self.client.tracks(&self.section.key))?;
        Ok(tracks.into_iter().map(to_track).collect())
    }

    fn list_playlists(&self) -> plexsync_core::Result<Vec<Playlist>> {
        let playlists = self.runtime.block_on(self.client.playlists())?;

        let mut result = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            if playlist.smart {
                result.push(Playlist::auto(playlist.title));
                continue;
            }

            let items = self
                .runtime
                .block_on(self.client.playlist_items(&playlist.rating_key))?;
            result.push(
                Playlist::new(playlist.title).with_tracks(items.into_iter().map(|item| item.rating_key)),
            );
        }

        debug!(count = result.len(), "Fetched playlists");
        Ok(result)
    }
}

impl CatalogWriter for PlexCatalog {
    fn write_rating(&mut self, track: &TrackId, rating: StarRating) -> plexsync_core::Result<()> {
        let value = f64::from(rating.to_ten_point());
        self.runtime.block_on(self.client.rate(track.as_str(), value))?;
        Ok(())
    }

    fn add_to_playlist(&mut self, playlist: &str, track: &TrackId) -> plexsync_core::Result<()> {
        let uri = self.track_uri(track);

        if let Some(key) = self.playlist_keys()?.get(playlist).cloned() {
            self.runtime.block_on(self.client.add_to_playlist(&key, &uri))?;
            return Ok(());
        }

        let created = self
            .runtime
            .block_on(self.client.create_playlist(playlist, &uri))?;
        self.playlist_keys()?
            .insert(playlist.to_string(), created.rating_key);
        Ok(())
    }

    fn remove_from_playlist(&mut self, playlist: &str, track: &TrackId) -> plexsync_core::Result<()> {
        let Some(key) = self.playlist_keys()?.get(playlist).cloned() else {
            debug!(playlist = %playlist, "Playlist not on server, nothing to remove");
            return Ok(());
        };

        let items = self.runtime.block_on(self.client.playlist_items(&key))?;
        let item_ids: Vec<u64> = items
            .into_iter()
            .filter(|item| item.rating_key == track.as_str())
            .filter_map(|item| item.playlist_item_id)
            .collect();

        for item_id in item_ids {
            self.runtime
                .block_on(self.client.remove_from_playlist(&key, item_id))?;
        }
        Ok(())
    }
}
