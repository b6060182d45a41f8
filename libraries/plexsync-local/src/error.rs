/// Local catalog errors
use plexsync_core::CatalogError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `LocalCatalogError`
pub type Result<T> = std::result::Result<T, LocalCatalogError>;

/// Local catalog error types
#[derive(Error, Debug)]
pub enum LocalCatalogError {
    /// A configured directory does not exist
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The track id does not name a file in the music directory
    #[error("Unknown track: {0}")]
    UnknownTrack(String),

    /// The file's tag format cannot hold a rating
    #[error("Cannot store a rating in {0}")]
    UnsupportedRating(String),

    /// Playlist name cannot be used as a file name
    #[error("Invalid playlist name: {0:?}")]
    InvalidPlaylistName(String),

    /// Playlists were not configured
    #[error("No playlist directory configured")]
    NoPlaylistDir,

    /// Tag writing error
    #[error("Tag writing error: {0}")]
    TagWriteError(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

impl From<LocalCatalogError> for CatalogError {
    fn from(err: LocalCatalogError) -> Self {
        match err {
            LocalCatalogError::UnknownTrack(id) => CatalogError::not_found("Track", id),
            LocalCatalogError::FileNotFound(path) => CatalogError::not_found("File", path),
            LocalCatalogError::UnsupportedRating(_) | LocalCatalogError::NoPlaylistDir => {
                CatalogError::unsupported(err.to_string())
            }
            LocalCatalogError::InvalidPlaylistName(_) => CatalogError::invalid_data(err.to_string()),
            LocalCatalogError::Io(io) => CatalogError::Io(io),
            other => CatalogError::backend(other.to_string()),
        }
    }
}
