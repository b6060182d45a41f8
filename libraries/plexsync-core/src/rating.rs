//! Rating values and the POPM rating codec
//!
//! Two numeric domains meet at the catalog boundaries:
//!
//! - the **half-star domain** (`StarRating`): 0.0 to 5.0 in steps of 0.5, eleven values
//! - the **encoded domain**: the single byte stored in an ID3v2 `POPM` frame (0-255)
//!
//! The byte convention is not linear. Whole stars follow the Windows Media Player values
//! (1, 64, 128, 196, 255) and half stars sit in between, so the mapping is an explicit
//! lookup table rather than a formula.

use crate::error::InvalidRatingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoded value for 0.0 stars. Also the "unrated" marker when decoding.
pub const POPM_ZERO_STARS: u8 = 0;
/// Encoded value for 0.5 stars
pub const POPM_HALF_STAR: u8 = 13;
/// Encoded value for 1.0 stars
pub const POPM_ONE_STAR: u8 = 1;
/// Encoded value for 1.5 stars
pub const POPM_ONE_AND_HALF_STARS: u8 = 54;
/// Encoded value for 2.0 stars
pub const POPM_TWO_STARS: u8 = 64;
/// Encoded value for 2.5 stars
pub const POPM_TWO_AND_HALF_STARS: u8 = 118;
/// Encoded value for 3.0 stars
pub const POPM_THREE_STARS: u8 = 128;
/// Encoded value for 3.5 stars
pub const POPM_THREE_AND_HALF_STARS: u8 = 186;
/// Encoded value for 4.0 stars
pub const POPM_FOUR_STARS: u8 = 196;
/// Encoded value for 4.5 stars
pub const POPM_FOUR_AND_HALF_STARS: u8 = 242;
/// Encoded value for 5.0 stars
pub const POPM_FIVE_STARS: u8 = 255;

/// Encoded byte per half step, indexed by `StarRating::half_steps()`.
const ENCODED_BY_HALF_STEP: [u8; 11] = [
    POPM_ZERO_STARS,
    POPM_HALF_STAR,
    POPM_ONE_STAR,
    POPM_ONE_AND_HALF_STARS,
    POPM_TWO_STARS,
    POPM_TWO_AND_HALF_STARS,
    POPM_THREE_STARS,
    POPM_THREE_AND_HALF_STARS,
    POPM_FOUR_STARS,
    POPM_FOUR_AND_HALF_STARS,
    POPM_FIVE_STARS,
];

const MAX_HALF_STEPS: u8 = 10;

/// A rating in the half-star domain.
///
/// Stored as a count of half stars (0..=10) so that only the eleven canonical values
/// can exist. Use [`StarRating::from_stars`] to validate an arbitrary `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct StarRating(u8);

impl StarRating {
    /// 0.0 stars
    pub const ZERO: Self = Self(0);
    /// 5.0 stars
    pub const MAX: Self = Self(MAX_HALF_STEPS);

    /// Create a rating from a number of half stars (0..=10)
    pub fn from_half_steps(half_steps: u8) -> Result<Self, InvalidRatingError> {
        if half_steps > MAX_HALF_STEPS {
            return Err(InvalidRatingError {
                value: f64::from(half_steps) / 2.0,
            });
        }
        Ok(Self(half_steps))
    }

    /// Create a rating from a star value.
    ///
    /// Fails unless `stars` is exactly one of 0.0, 0.5, ..., 5.0.
    pub fn from_stars(stars: f64) -> Result<Self, InvalidRatingError> {
        let doubled = stars * 2.0;
        if !(0.0..=f64::from(MAX_HALF_STEPS)).contains(&doubled) || doubled.fract() != 0.0 {
            return Err(InvalidRatingError { value: stars });
        }
        Ok(Self(doubled as u8))
    }

    /// Create a rating from a linear 0-10 value (one unit per half star).
    ///
    /// Out-of-range input is clamped; fractional input rounds to the nearest half star
    /// with ties going to the lower value. Returns `None` for NaN.
    pub fn from_ten_point(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        let clamped = value.clamp(0.0, f64::from(MAX_HALF_STEPS));
        let lower = clamped.floor();
        let steps = if clamped - lower > 0.5 { lower + 1.0 } else { lower };
        Some(Self(steps as u8))
    }

    /// The rating in stars
    pub fn stars(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    /// Number of half stars (0..=10)
    pub fn half_steps(self) -> u8 {
        self.0
    }

    /// The rating on a linear 0-10 scale
    pub fn to_ten_point(self) -> u8 {
        self.0
    }

    /// Whether this is the 0.0 rating
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// All eleven canonical ratings in ascending order
    pub fn all() -> impl Iterator<Item = StarRating> {
        (0..=MAX_HALF_STEPS).map(Self)
    }
}

impl TryFrom<f64> for StarRating {
    type Error = InvalidRatingError;

    fn try_from(stars: f64) -> Result<Self, Self::Error> {
        Self::from_stars(stars)
    }
}

impl From<StarRating> for f64 {
    fn from(rating: StarRating) -> Self {
        rating.stars()
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.stars())
    }
}

/// Conversion between `StarRating` and the POPM byte encoding.
///
/// Stateless; all methods are associated functions.
pub struct RatingCodec;

impl RatingCodec {
    /// Encode a rating as a POPM byte (exact table lookup)
    pub fn to_encoded(rating: StarRating) -> u8 {
        ENCODED_BY_HALF_STEP[usize::from(rating.half_steps())]
    }

    /// Encode a raw star value, rejecting anything outside the canonical domain
    pub fn encode_stars(stars: f64) -> Result<u8, InvalidRatingError> {
        StarRating::from_stars(stars).map(Self::to_encoded)
    }

    /// Decode a POPM byte into the half-star domain.
    ///
    /// Table values invert exactly. Any other byte (written by a tool using a different
    /// convention) resolves to the nearest table entry by absolute distance, ties going
    /// to the lower star value.
    pub fn to_stars(encoded: u8) -> StarRating {
        let mut best = StarRating::ZERO;
        let mut best_distance = u8::MAX;

        // Ascending star order, strict comparison: ties keep the lower rating.
        for rating in StarRating::all() {
            let distance = encoded.abs_diff(Self::to_encoded(rating));
            if distance < best_distance {
                best = rating;
                best_distance = distance;
            }
        }

        best
    }

    /// Decode a POPM byte read from a catalog that distinguishes "unrated" from 0 stars.
    ///
    /// `0` is the unrated marker and decodes to `None`.
    pub fn decode(encoded: u8) -> Option<StarRating> {
        if encoded == POPM_ZERO_STARS {
            None
        } else {
            Some(Self::to_stars(encoded))
        }
    }

    /// Encode an optional rating, writing the unrated marker for `None`
    pub fn encode(rating: Option<StarRating>) -> u8 {
        rating.map_or(POPM_ZERO_STARS, Self::to_encoded)
    }
}
