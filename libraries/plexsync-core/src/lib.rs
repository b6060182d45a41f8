//! PlexSync Core
//!
//! Platform-agnostic types, the rating codec and the catalog collaborator traits
//! shared by every PlexSync crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `CatalogSnapshot`
//! - **Rating Codec**: `StarRating` (half-star domain) and `RatingCodec` (POPM byte table)
//! - **Core Traits**: `CatalogReader`, `CatalogWriter`
//! - **Error Handling**: `CatalogError`, `InvalidRatingError`
//!
//! # Example
//!
//! ```rust
//! use plexsync_core::{RatingCodec, StarRating, Track, TrackId};
//!
//! let rating = StarRating::from_stars(4.0).unwrap();
//! assert_eq!(RatingCodec::to_encoded(rating), 196);
//! assert_eq!(RatingCodec::to_stars(200), rating);
//!
//! let track = Track::new(TrackId::new("42"), "Let It Be").with_artist("The Beatles");
//! assert_eq!(track.artist.as_deref(), Some("The Beatles"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod rating;
pub mod traits;
pub mod types;

pub use error::{CatalogError, InvalidRatingError, Result};
pub use rating::{RatingCodec, StarRating};
pub use traits::{Catalog, CatalogReader, CatalogWriter};
pub use types::{CatalogSnapshot, Playlist, PlaylistKind, Track, TrackId};
