//! PlexSync Plex Catalog
//!
//! HTTP client for a Plex Media Server music library, and a blocking catalog
//! adapter for the sync engine.
//!
//! # Features
//!
//! - **Authentication**: token from configuration, or plex.tv sign-in with username/password
//! - **Library**: music section discovery, track enumeration with user ratings
//! - **Ratings**: set a track's user rating (0-10)
//! - **Playlists**: list audio playlists and their items, add/remove items, create playlists
//!
//! # Example
//!
//! ```ignore
//! use plexsync_plex::{PlexCatalog, PlexConfig};
//! use plexsync_core::CatalogReader;
//!
//! let config = PlexConfig::new("http://192.168.1.10:32400").with_token("abc123");
//! let catalog = PlexCatalog::connect(config)?;
//! println!("{} tracks", catalog.list_tracks()?.len());
//! ```

mod auth;
mod catalog;
mod client;
mod error;
mod types;

pub use auth::{PlexAuthClient, PLEX_TV_URL};
pub use catalog::PlexCatalog;
pub use client::PlexClient;
pub use error::{PlexClientError, Result};
pub use types::{LibrarySection, PlexConfig, PlexPlaylist, PlexTrack, PlexUser, ServerIdentity};
