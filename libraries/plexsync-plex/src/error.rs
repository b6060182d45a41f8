//! Error types for the Plex client.

use plexsync_core::CatalogError;
use thiserror::Error;

/// Errors that can occur when interacting with a Plex server.
#[derive(Error, Debug)]
pub enum PlexClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// No token, or the server rejected it
    #[error("Authentication required")]
    AuthRequired,

    /// plex.tv rejected the credentials
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// The server has no music library
    #[error("No music library found on the server")]
    NoMusicSection,

    /// The configured library does not exist
    #[error("Music library '{0}' not found")]
    SectionNotFound(String),

    /// Several music libraries exist and none was configured
    #[error("Several music libraries found, choose one of: {}", .0.join(", "))]
    AmbiguousSection(Vec<String>),

    /// Failed to start the async runtime
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Plex client operations.
pub type Result<T> = std::result::Result<T, PlexClientError>;

impl From<PlexClientError> for CatalogError {
    fn from(err: PlexClientError) -> Self {
        match err {
            PlexClientError::ServerError { status: 404, message } => {
                CatalogError::not_found("Plex item", message)
            }
            PlexClientError::ParseError(msg) => CatalogError::invalid_data(msg),
            other => CatalogError::backend(other.to_string()),
        }
    }
}
