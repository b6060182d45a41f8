/// Domain types shared by all PlexSync crates
mod catalog;
mod ids;
mod playlist;
mod track;

pub use catalog::CatalogSnapshot;
pub use ids::TrackId;
pub use playlist::{Playlist, PlaylistKind};
pub use track::Track;
