//! PlexSync Local Catalog
//!
//! The local side of a sync: a directory of audio files plus a directory of M3U
//! playlists.
//!
//! This crate provides:
//! - Tag reading from audio files (MP3, FLAC, OGG, WAV, M4A, ...) via lofty
//! - Star ratings stored in ID3v2 `POPM` frames
//! - M3U / M3U8 playlist reading and editing
//! - `LocalCatalog`, implementing `CatalogReader` and `CatalogWriter`
//!
//! # Example
//!
//! ```rust,no_run
//! use plexsync_core::CatalogReader;
//! use plexsync_local::{LocalCatalog, LocalCatalogConfig};
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = LocalCatalog::open(LocalCatalogConfig::new("/music").with_playlists_dir("/music/playlists"))?;
//! for track in catalog.list_tracks()? {
//!     println!("{} ({:?})", track, track.rating);
//! }
//! # Ok(())
//! # }
//! ```

mod catalog;
mod error;

pub mod playlists;
pub mod tags;

pub use catalog::{LocalCatalog, LocalCatalogConfig, DEFAULT_EXTENSIONS};
pub use error::{LocalCatalogError, Result};
pub use playlists::M3uPlaylist;
pub use tags::{read_track_tags, write_rating, TrackTags, RATING_EMAIL};
