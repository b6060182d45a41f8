//! Fuzzy scoring and best-candidate selection
//!
//! Scores are on a 0-100 scale. Title and artist similarity use normalized Levenshtein
//! distance over the fingerprints; duration agreement then adjusts the weighted score.

use crate::error::UnidentifiableTrackError;
use crate::fingerprint::TrackFingerprint;
use crate::options::MatchConfig;
use plexsync_core::Track;
use std::cmp::Ordering;
use strsim::normalized_levenshtein;

const MAX_SCORE: f64 = 100.0;

/// How the durations of two tracks compare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationAgreement {
    /// At least one duration is missing
    Unknown,
    /// Within the tolerance; the bonus was added
    Agree,
    /// Neither agreeing nor mismatched; no adjustment
    Neutral,
    /// Further apart than the mismatch limit; the score was capped
    Mismatch,
}

/// Components of a candidate's score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub title: f64,
    pub artist: f64,
    /// Weighted mean of title and artist, before the duration adjustment
    pub weighted: f64,
    pub duration: DurationAgreement,
    /// Final score
    pub total: f64,
}

/// A scored pairing of a source track with a target track
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate<'a> {
    pub source: &'a Track,
    pub target: &'a Track,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Outcome of matching one source track
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult<'a> {
    Matched(MatchCandidate<'a>),
    /// No candidate reached the minimum score. `best_score` is the highest score seen,
    /// if any candidate was scored at all.
    NoMatch { best_score: Option<f64> },
}

impl<'a> MatchResult<'a> {
    /// The selected candidate, if any
    pub fn candidate(&self) -> Option<&MatchCandidate<'a>> {
        match self {
            Self::Matched(candidate) => Some(candidate),
            Self::NoMatch { .. } => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// Selects the best target track for a source track
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    config: MatchConfig,
}

impl MatchEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Score a pair of fingerprints
    pub fn score(&self, source: &TrackFingerprint, target: &TrackFingerprint) -> ScoreBreakdown {
        let config = &self.config;

        let title = similarity(&source.title, &target.title);
        let artist = match (source.artist.is_empty(), target.artist.is_empty()) {
            (true, true) => MAX_SCORE,
            (true, false) | (false, true) => 0.0,
            (false, false) => similarity(&source.artist, &target.artist),
        };

        let weighted = (config.title_weight * title + config.artist_weight * artist)
            / (config.title_weight + config.artist_weight);

        let (duration, total) = match (source.duration_secs, target.duration_secs) {
            (Some(a), Some(b)) => {
                let delta = a.abs_diff(b);
                if delta <= config.duration_tolerance_seconds {
                    (
                        DurationAgreement::Agree,
                        (weighted + config.duration_bonus).min(MAX_SCORE),
                    )
                } else if delta > config.duration_mismatch_seconds {
                    (
                        DurationAgreement::Mismatch,
                        weighted.min(config.duration_mismatch_cap),
                    )
                } else {
                    (DurationAgreement::Neutral, weighted)
                }
            }
            _ => (DurationAgreement::Unknown, weighted),
        };

        ScoreBreakdown {
            title,
            artist,
            weighted,
            duration,
            total,
        }
    }

    /// Whether a score reaches the minimum (inclusive)
    pub fn is_eligible(&self, score: f64) -> bool {
        score >= self.config.min_score
    }

    /// Pick the best of already fingerprinted candidates.
    ///
    /// The highest eligible score wins. Exact ties prefer the candidate whose album
    /// fingerprint equals the source's, then the earliest candidate.
    pub fn best_match<'a, 'f, I>(
        &self,
        source: &'a Track,
        source_fingerprint: &TrackFingerprint,
        candidates: I,
    ) -> MatchResult<'a>
    where
        I: IntoIterator<Item = (&'a Track, &'f TrackFingerprint)>,
    {
        let mut best: Option<(MatchCandidate<'a>, bool)> = None;
        let mut best_score: Option<f64> = None;

        for (target, target_fingerprint) in candidates {
            let breakdown = self.score(source_fingerprint, target_fingerprint);
            let score = breakdown.total;
            best_score = Some(best_score.map_or(score, |seen| seen.max(score)));

            if !self.is_eligible(score) {
                continue;
            }

            let album_match = source_fingerprint.album == target_fingerprint.album;
            let replace = match &best {
                None => true,
                Some((current, current_album_match)) => match score.total_cmp(&current.score) {
                    Ordering::Greater => true,
                    Ordering::Equal => album_match && !current_album_match,
                    Ordering::Less => false,
                },
            };

            if replace {
                best = Some((
                    MatchCandidate {
                        source,
                        target,
                        score,
                        breakdown,
                    },
                    album_match,
                ));
            }
        }

        match best {
            Some((candidate, _)) => MatchResult::Matched(candidate),
            None => MatchResult::NoMatch { best_score },
        }
    }

    /// Find the best match for `source` among raw candidate tracks.
    ///
    /// Candidates that cannot be fingerprinted are ignored.
    ///
    /// # Errors
    /// Returns `UnidentifiableTrackError` when the source track has no usable title
    pub fn find_best_match<'a, I>(
        &self,
        source: &'a Track,
        candidates: I,
    ) -> Result<MatchResult<'a>, UnidentifiableTrackError>
    where
        I: IntoIterator<Item = &'a Track>,
    {
        let source_fingerprint = TrackFingerprint::from_track(source)?;
        let fingerprinted: Vec<(&'a Track, TrackFingerprint)> = candidates
            .into_iter()
            .filter_map(|track| TrackFingerprint::from_track(track).ok().map(|fp| (track, fp)))
            .collect();

        Ok(self.best_match(
            source,
            &source_fingerprint,
            fingerprinted.iter().map(|(track, fp)| (*track, fp)),
        ))
    }
}

fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * MAX_SCORE
}
