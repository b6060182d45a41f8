//! Plex Media Server HTTP client.

use crate::error::{PlexClientError, Result};
use crate::types::{
    DirectoryContainer, Envelope, LibrarySection, MetadataContainer, PlexConfig, PlexPlaylist,
    PlexTrack, ServerIdentity, PRODUCT_NAME,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Plex item type for tracks
const TRACK_TYPE: u8 = 10;

/// Agent identifier that owns library ratings
const LIBRARY_IDENTIFIER: &str = "com.plexapp.plugins.library";

/// Client for one Plex Media Server.
///
/// # Example
///
/// ```ignore
/// use plexsync_plex::{PlexClient, PlexConfig};
///
/// let client = PlexClient::new(PlexConfig::new("http://localhost:32400").with_token("abc"))?;
/// let section = client.music_section(None).await?;
/// let tracks = client.tracks(&section.key).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PlexClient {
    http: Client,
    base_url: String,
}

impl PlexClient {
    /// Create a new client with the given configuration.
    pub fn new(config: PlexConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(PlexClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.url.trim_end_matches('/').to_string();
        let parsed =
            url::Url::parse(&base_url).map_err(|e| PlexClientError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PlexClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("x-plex-product", HeaderValue::from_static(PRODUCT_NAME));
        headers.insert(
            "x-plex-client-identifier",
            header_value(&config.client_identifier)?,
        );
        if let Some(token) = &config.token {
            let mut value = header_value(token)?;
            value.set_sensitive(true);
            headers.insert("x-plex-token", value);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("{}/{}", PRODUCT_NAME, env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Get the server URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the server's identity. Does not require authentication.
    pub async fn identity(&self) -> Result<ServerIdentity> {
        let envelope: Envelope<ServerIdentity> = self.get_json("/identity", &[]).await?;
        let identity = envelope.media_container;

        info!(
            machine_identifier = %identity.machine_identifier,
            version = ?identity.version,
            "Connected to Plex server"
        );

        Ok(identity)
    }

    /// List all library sections.
    pub async fn sections(&self) -> Result<Vec<LibrarySection>> {
        let envelope: Envelope<DirectoryContainer> =
            self.get_json("/library/sections", &[]).await?;
        Ok(envelope.media_container.directories)
    }

    /// Resolve the music library to sync.
    ///
    /// With a selector, the music section whose title or key equals it. Without one,
    /// the only music section on the server.
    pub async fn music_section(&self, selector: Option<&str>) -> Result<LibrarySection> {
        let mut music: Vec<LibrarySection> = self
            .sections()
            .await?
            .into_iter()
            .filter(LibrarySection::is_music)
            .collect();

        if let Some(selector) = selector {
            return music
                .into_iter()
                .find(|s| s.title == selector || s.key == selector)
                .ok_or_else(|| PlexClientError::SectionNotFound(selector.to_string()));
        }

        match music.len() {
            0 => Err(PlexClientError::NoMusicSection),
            1 => Ok(music.remove(0)),
            _ => Err(PlexClientError::AmbiguousSection(
                music.into_iter().map(|s| s.title).collect(),
            )),
        }
    }

    /// List every track of a library section.
    pub async fn tracks(&self, section_key: &str) -> Result<Vec<PlexTrack>> {
        let path = format!("/library/sections/{section_key}/all");
        let envelope: Envelope<MetadataContainer<PlexTrack>> = self
            .get_json(&path, &[("type", TRACK_TYPE.to_string())])
            .await?;

        let tracks = envelope.media_container.metadata;
        debug!(section = %section_key, count = tracks.len(), "Fetched tracks");
        Ok(tracks)
    }

    /// Set a track's user rating on the 0-10 scale.
    pub async fn rate(&self, rating_key: &str, rating: f64) -> Result<()> {
        debug!(rating_key = %rating_key, rating, "Setting rating");
        self.send(
            Method::PUT,
            "/:/rate",
            &[
                ("key", rating_key.to_string()),
                ("identifier", LIBRARY_IDENTIFIER.to_string()),
                ("rating", rating.to_string()),
            ],
        )
        .await?;
        Ok(())
    }

    /// List audio playlists, smart ones included.
    pub async fn playlists(&self) -> Result<Vec<PlexPlaylist>> {
        let envelope: Envelope<MetadataContainer<PlexPlaylist>> = self
            .get_json("/playlists", &[("playlistType", "audio".to_string())])
            .await?;
        Ok(envelope.media_container.metadata)
    }

    /// List the tracks of a playlist. Items carry their `playlistItemID`.
    pub async fn playlist_items(&self, playlist_key: &str) -> Result<Vec<PlexTrack>> {
        let path = format!("/playlists/{playlist_key}/items");
        let envelope: Envelope<MetadataContainer<PlexTrack>> = self.get_json(&path, &[]).await?;
        Ok(envelope.media_container.metadata)
    }

    /// Create a playlist holding the items of `uri`.
    pub async fn create_playlist(&self, title: &str, uri: &str) -> Result<PlexPlaylist> {
        let response = self
            .send(
                Method::POST,
                "/playlists",
                &[
                    ("type", "audio".to_string()),
                    ("title", title.to_string()),
                    ("smart", "0".to_string()),
                    ("uri", uri.to_string()),
                ],
            )
            .await?;

        let envelope: Envelope<MetadataContainer<PlexPlaylist>> = parse(response).await?;
        let playlist = envelope
            .media_container
            .metadata
            .into_iter()
            .next()
            .ok_or_else(|| PlexClientError::ParseError("Created playlist missing from response".into()))?;

        info!(title = %playlist.title, rating_key = %playlist.rating_key, "Created playlist");
        Ok(playlist)
    }

    /// Append the items of `uri` to a playlist.
    pub async fn add_to_playlist(&self, playlist_key: &str, uri: &str) -> Result<()> {
        let path = format!("/playlists/{playlist_key}/items");
        self.send(Method::PUT, &path, &[("uri", uri.to_string())])
            .await?;
        Ok(())
    }

    /// Remove one item, identified by its `playlistItemID`, from a playlist.
    pub async fn remove_from_playlist(&self, playlist_key: &str, playlist_item_id: u64) -> Result<()> {
        let path = format!("/playlists/{playlist_key}/items/{playlist_item_id}");
        self.send(Method::DELETE, &path, &[]).await?;
        Ok(())
    }

    /// Library URI addressing one item, as accepted by the playlist endpoints.
    pub fn library_uri(machine_identifier: &str, rating_key: &str) -> String {
        format!("server://{machine_identifier}/{LIBRARY_IDENTIFIER}/library/metadata/{rating_key}")
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.send(Method::GET, path, query).await?;
        parse(response).await
    }

    async fn send(&self, method: Method, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "Plex request");

        let response = self
            .http
            .request(method, &url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    PlexClientError::ServerUnreachable(e.to_string())
                } else {
                    PlexClientError::Request(e)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %url, "Plex server rejected the request: missing or invalid token");
            return Err(PlexClientError::AuthRequired);
        }

        let error_text = response.text().await.unwrap_or_default();
        Err(PlexClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        })
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| PlexClientError::ParseError(format!("Failed to parse Plex response: {e}")))
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| PlexClientError::AuthFailed("credentials contain invalid characters".into()))
}
