//! Track tag reading and rating writing
//!
//! Ratings live in ID3v2 `POPM` (popularimeter) frames. A `POPM` frame holds an owner
//! email, a single rating byte and a play counter; several frames with different
//! owners may coexist. The rating byte uses the non-linear scale implemented by
//! `RatingCodec`.

use crate::error::{LocalCatalogError, Result};
use lofty::{AudioFile, ItemKey, ItemValue, Probe, Tag, TagExt, TagItem, TagType, TaggedFileExt};
use plexsync_core::{RatingCodec, StarRating};
use std::path::Path;
use tracing::debug;

/// Owner email written into the `POPM` frames this crate creates
pub const RATING_EMAIL: &str = "plexsync@localhost";

/// Identity and rating fields read from an audio file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub track_number: Option<u32>,
    pub duration_ms: Option<u64>,
    /// `None` when the file carries no rating or the unrated marker
    pub rating: Option<StarRating>,
}

/// Parsed `POPM` frame content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popularimeter {
    pub email: String,
    pub rating: u8,
    pub counter: u64,
}

impl Popularimeter {
    /// Parse raw frame content: Latin-1 email, NUL, rating byte, optional big-endian
    /// counter
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let nul = bytes.iter().position(|&b| b == 0)?;
        let email: String = bytes[..nul].iter().map(|&b| char::from(b)).collect();
        let rating = *bytes.get(nul + 1)?;
        let counter = bytes[nul + 2..]
            .iter()
            .take(8)
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));

        Some(Self {
            email,
            rating,
            counter,
        })
    }

    /// Encode as raw frame content (4-byte counter)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self
            .email
            .chars()
            .map(|c| u8::try_from(c).unwrap_or(b'?'))
            .collect();
        bytes.push(0);
        bytes.push(self.rating);
        let counter = u32::try_from(self.counter).unwrap_or(u32::MAX);
        bytes.extend_from_slice(&counter.to_be_bytes());
        bytes
    }
}

/// Parse a track number, accepting the `n/total` form
fn parse_track_number(s: &str) -> Option<u32> {
    s.split('/').next()?.trim().parse().ok()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Pick the rating from the `POPM` items of a tag.
///
/// Our own frame wins; otherwise the first frame with a rating byte.
fn rating_from_tag(tag: &Tag) -> Option<u8> {
    let frames: Vec<Popularimeter> = tag
        .get_items(&ItemKey::Popularimeter)
        .filter_map(|item| match item.value() {
            ItemValue::Binary(bytes) => Popularimeter::parse(bytes),
            _ => None,
        })
        .collect();

    frames
        .iter()
        .find(|frame| frame.email == RATING_EMAIL)
        .or_else(|| frames.first())
        .map(|frame| frame.rating)
}

/// Read identity fields and rating from an audio file
///
/// # Arguments
/// * `path` - Path to the audio file
pub fn read_track_tags<P: AsRef<Path>>(path: P) -> Result<TrackTags> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LocalCatalogError::FileNotFound(path.display().to_string()));
    }

    let tagged_file = Probe::open(path)?.read()?;
    let duration = tagged_file.properties().duration();

    let mut tags = TrackTags {
        duration_ms: (!duration.is_zero()).then(|| duration.as_millis() as u64),
        ..TrackTags::default()
    };

    // Primary tag first, then any other tag for fields still missing
    let ordered = tagged_file
        .primary_tag()
        .into_iter()
        .chain(tagged_file.tags().iter());

    let mut rating_byte = None;
    for tag in ordered {
        if tags.title.is_none() {
            tags.title = non_empty(tag.get_string(&ItemKey::TrackTitle));
        }
        if tags.artist.is_none() {
            tags.artist = non_empty(tag.get_string(&ItemKey::TrackArtist));
        }
        if tags.album.is_none() {
            tags.album = non_empty(tag.get_string(&ItemKey::AlbumTitle));
        }
        if tags.track_number.is_none() {
            tags.track_number = tag.get_string(&ItemKey::TrackNumber).and_then(parse_track_number);
        }
        if rating_byte.is_none() {
            rating_byte = rating_from_tag(tag);
        }
    }

    tags.rating = rating_byte.and_then(RatingCodec::decode);
    debug!("Read tags from {:?}: {:?}", path, tags);

    Ok(tags)
}

/// Write a rating into the file's primary tag
///
/// # Notes
/// - Replaces existing `POPM` frames with one owned by `RATING_EMAIL`
/// - Preserves all other tag items
/// - Fails with `UnsupportedRating` when the primary tag is not ID3v2. Vorbis comments and
///   MP4 atoms accept a popularimeter item but drop its binary value on save.
pub fn write_rating<P: AsRef<Path>>(path: P, rating: StarRating) -> Result<()> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LocalCatalogError::FileNotFound(path.display().to_string()));
    }

    let mut tagged_file = Probe::open(path)?.read()?;

    let tag_type = tagged_file.primary_tag_type();
    if tag_type != TagType::Id3v2 {
        return Err(LocalCatalogError::UnsupportedRating(format!("{tag_type:?} tags")));
    }

    // Get or create the primary tag
    if tagged_file.tag(tag_type).is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file
        .tag_mut(tag_type)
        .ok_or_else(|| LocalCatalogError::TagWriteError(format!("no {tag_type:?} tag")))?;

    let counter = tag
        .get_items(&ItemKey::Popularimeter)
        .filter_map(|item| match item.value() {
            ItemValue::Binary(bytes) => Popularimeter::parse(bytes),
            _ => None,
        })
        .find(|frame| frame.email == RATING_EMAIL)
        .map_or(0, |frame| frame.counter);

    let frame = Popularimeter {
        email: RATING_EMAIL.to_string(),
        rating: RatingCodec::to_encoded(rating),
        counter,
    };

    tag.remove_key(&ItemKey::Popularimeter);
    if !tag.insert(TagItem::new(ItemKey::Popularimeter, ItemValue::Binary(frame.to_bytes()))) {
        return Err(LocalCatalogError::UnsupportedRating(format!("{tag_type:?} tags")));
    }

    tag.save_to_path(path)
        .map_err(|e: lofty::error::LoftyError| LocalCatalogError::TagWriteError(e.to_string()))?;

    debug!("Wrote rating {} to {:?}", rating, path);

    Ok(())
}
