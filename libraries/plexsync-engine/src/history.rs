//! Source ratings remembered between runs

use plexsync_core::{CatalogSnapshot, StarRating, Track, TrackId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ratings of the source catalog's rated tracks as of a completed run.
///
/// Incremental runs only propagate ratings for source tracks whose current rating differs
/// from the recorded one. Zero-star ratings are treated as unrated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingHistory {
    ratings: BTreeMap<TrackId, StarRating>,
}

impl RatingHistory {
    /// Record the rated tracks of a snapshot
    pub fn capture(snapshot: &CatalogSnapshot) -> Self {
        let ratings = snapshot
            .tracks
            .iter()
            .filter_map(|track| effective_rating(track).map(|rating| (track.id.clone(), rating)))
            .collect();

        Self { ratings }
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn get(&self, id: &TrackId) -> Option<StarRating> {
        self.ratings.get(id).copied()
    }

    /// Whether the track's rating equals the recorded one.
    ///
    /// An unrated track that was never recorded is unchanged; it has nothing to propagate.
    pub fn is_unchanged(&self, track: &Track) -> bool {
        self.get(&track.id) == effective_rating(track)
    }
}

fn effective_rating(track: &Track) -> Option<StarRating> {
    track.rating.filter(|rating| !rating.is_zero())
}
