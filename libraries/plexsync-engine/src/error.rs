use crate::types::SyncAction;
use plexsync_core::{CatalogError, TrackId};
use thiserror::Error;

/// Errors that abort a sync run
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error ({catalog}): {source}")]
    Catalog {
        catalog: String,
        #[source]
        source: CatalogError,
    },
}

impl EngineError {
    pub fn catalog(catalog: impl Into<String>, source: CatalogError) -> Self {
        Self::Catalog {
            catalog: catalog.into(),
            source,
        }
    }
}

/// Malformed configuration, detected before any catalog I/O
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid sync item '{0}' (expected one of: tracks, playlists)")]
    UnknownSyncItem(String),

    #[error("No sync items selected")]
    NoSyncItems,

    #[error("Invalid conflict policy '{0}' (expected one of: source-wins, preserve-target)")]
    UnknownConflictPolicy(String),

    #[error("Invalid match configuration: {0}")]
    InvalidMatchConfig(String),
}

/// A track lacks the minimum identity fields (a title) and cannot be matched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Track {track_id} has no usable title")]
pub struct UnidentifiableTrackError {
    pub track_id: TrackId,
}

/// A single write against the target catalog failed
#[derive(Error, Debug)]
#[error("Failed to {action}: {source}")]
pub struct ActionExecutionError {
    pub action: SyncAction,
    pub source: CatalogError,
}

pub type Result<T> = std::result::Result<T, EngineError>;
