//! Normalized identity keys for cross-catalog matching

use crate::error::UnidentifiableTrackError;
use plexsync_core::Track;

/// Album and artist names players use when the tag is missing
const PLACEHOLDER_NAMES: &[&str] = &[
    "[unknown album]",
    "unknown album",
    "[unknown artist]",
    "unknown artist",
];

/// Articles that catalogs move to the end of sort-friendly artist names ("Beatles, The")
const TRAILING_ARTICLES: &[&str] = &["the", "a", "an"];

/// Catalog-independent comparison key for a track.
///
/// Two tracks from different catalogs that describe the same recording should produce
/// equal or nearly equal fingerprints even when their tags were written by different
/// tools.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackFingerprint {
    /// Lowercased title with punctuation stripped and whitespace collapsed. Never empty.
    pub title: String,
    /// Lowercased artist, empty when unknown
    pub artist: String,
    /// Lowercased album, empty when unknown
    pub album: String,
    /// Duration rounded to the nearest second
    pub duration_secs: Option<u64>,
    /// Track number within the album
    pub track_number: Option<u32>,
}

impl TrackFingerprint {
    /// Derive the fingerprint of a track.
    ///
    /// Fails when the title is missing or normalizes to nothing, since the title is
    /// the minimum identity anchor.
    pub fn from_track(track: &Track) -> Result<Self, UnidentifiableTrackError> {
        let title = normalize_title(&track.title);
        if title.is_empty() {
            return Err(UnidentifiableTrackError {
                track_id: track.id.clone(),
            });
        }

        Ok(Self {
            title,
            artist: track.artist.as_deref().map(normalize_artist).unwrap_or_default(),
            album: track.album.as_deref().map(normalize_album).unwrap_or_default(),
            duration_secs: track.duration_ms.map(|ms| (ms + 500) / 1000),
            track_number: track.track_number,
        })
    }
}

/// Lowercase, strip punctuation, collapse whitespace.
///
/// Apostrophes are dropped ("Don't" -> "dont"); any other non-alphanumeric character
/// separates words ("AC/DC" -> "ac dc").
pub fn normalize_title(title: &str) -> String {
    let stripped: String = title
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}' | '`'))
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    collapse_whitespace(&stripped.to_lowercase())
}

/// Lowercase and collapse whitespace; "Beatles, The" becomes "the beatles"
pub fn normalize_artist(artist: &str) -> String {
    let normalized = collapse_whitespace(&artist.to_lowercase());
    if is_placeholder(&normalized) {
        return String::new();
    }

    if let Some((name, article)) = normalized.rsplit_once(", ") {
        if TRAILING_ARTICLES.contains(&article) && !name.is_empty() {
            return format!("{article} {name}");
        }
    }

    normalized
}

/// Lowercase and collapse whitespace; placeholder album names become empty
pub fn normalize_album(album: &str) -> String {
    let normalized = collapse_whitespace(&album.to_lowercase());
    if is_placeholder(&normalized) {
        String::new()
    } else {
        normalized
    }
}

fn is_placeholder(name: &str) -> bool {
    PLACEHOLDER_NAMES.contains(&name)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
