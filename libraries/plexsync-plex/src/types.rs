//! Types for Plex Media Server API requests and responses.

use serde::{Deserialize, Deserializer};

/// Product name sent in `X-Plex-Product`
pub const PRODUCT_NAME: &str = "PlexSync";

/// Configuration for connecting to a Plex server.
#[derive(Debug, Clone)]
pub struct PlexConfig {
    /// Base URL of the server (e.g., "http://192.168.1.10:32400")
    pub url: String,
    /// `X-Plex-Token` for the account
    pub token: Option<String>,
    /// Music library to use, by title or key
    pub section: Option<String>,
    /// Stable id of this client, sent in `X-Plex-Client-Identifier`
    pub client_identifier: String,
}

impl PlexConfig {
    /// Create a new config with just the URL and a random client identifier.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            section: None,
            client_identifier: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_client_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.client_identifier = identifier.into();
        self
    }
}

// =============================================================================
// Response envelopes
// =============================================================================

/// Every Plex JSON response wraps its payload in a `MediaContainer` object.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectoryContainer {
    #[serde(rename = "Directory", default)]
    pub directories: Vec<LibrarySection>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetadataContainer<T> {
    #[serde(rename = "Metadata", default = "Vec::new")]
    pub metadata: Vec<T>,
}

// =============================================================================
// Server and library types
// =============================================================================

/// Response from `/identity`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerIdentity {
    pub machine_identifier: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// A library section (`/library/sections`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LibrarySection {
    pub key: String,
    pub title: String,
    /// "artist" for music libraries
    #[serde(rename = "type")]
    pub section_type: String,
}

impl LibrarySection {
    pub fn is_music(&self) -> bool {
        self.section_type == "artist"
    }
}

/// A track (`type=10`) as returned by library and playlist listings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexTrack {
    pub rating_key: String,
    #[serde(default)]
    pub title: String,
    /// Artist
    #[serde(default)]
    pub grandparent_title: Option<String>,
    /// Album
    #[serde(default)]
    pub parent_title: Option<String>,
    /// Track number
    #[serde(default)]
    pub index: Option<u32>,
    /// Duration in milliseconds
    #[serde(default)]
    pub duration: Option<u64>,
    /// 0-10, absent when unrated
    #[serde(default)]
    pub user_rating: Option<f64>,
    /// Position id inside a playlist; only set on playlist items
    #[serde(rename = "playlistItemID", default)]
    pub playlist_item_id: Option<u64>,
}

/// An audio playlist (`/playlists?playlistType=audio`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexPlaylist {
    pub rating_key: String,
    pub title: String,
    #[serde(default, deserialize_with = "flag")]
    pub smart: bool,
    #[serde(default)]
    pub playlist_type: Option<String>,
    #[serde(default)]
    pub leaf_count: Option<u64>,
}

// =============================================================================
// plex.tv account
// =============================================================================

/// Response from `users/sign_in.json`.
#[derive(Debug, Deserialize)]
pub(crate) struct SignInResponse {
    pub user: PlexUser,
}

/// The signed-in plex.tv account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexUser {
    #[serde(default)]
    pub username: Option<String>,
    pub auth_token: String,
}

/// Plex sends flags as booleans, numbers or strings depending on the endpoint.
fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
        Flag::Text(value) => matches!(value.as_str(), "1" | "true"),
    })
}
