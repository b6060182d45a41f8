use crate::error::ActionExecutionError;
use crate::history::RatingHistory;
use crate::options::SyncDirection;
use plexsync_core::{StarRating, Track, TrackId};
use serde::Serialize;
use std::fmt;

/// Why a source track produced no rating or playlist actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum SkipReason {
    /// No target candidate reached the minimum score
    Unmatched,
    /// The track has no usable title
    Unidentifiable,
    /// An earlier source track already matched the same target track
    DuplicateTarget,
    /// Both sides carry different ratings and the target is preserved
    ConflictingRating {
        source: StarRating,
        target: StarRating,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unmatched => write!(f, "unmatched"),
            Self::Unidentifiable => write!(f, "unidentifiable"),
            Self::DuplicateTarget => write!(f, "duplicate target"),
            Self::ConflictingRating { source, target } => {
                write!(f, "conflicting rating (source {source}, target {target})")
            }
        }
    }
}

/// One planned change against the target catalog.
///
/// `track` is the target track for rating and playlist actions and the source track
/// for `Skip`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum SyncAction {
    ApplyRating {
        track: Track,
        rating: StarRating,
        previous: Option<StarRating>,
    },
    AddToPlaylist {
        track: Track,
        playlist: String,
    },
    RemoveFromPlaylist {
        track: Track,
        playlist: String,
    },
    Skip {
        track: Track,
        reason: SkipReason,
    },
}

impl SyncAction {
    /// The track this action refers to
    pub fn track(&self) -> &Track {
        match self {
            Self::ApplyRating { track, .. }
            | Self::AddToPlaylist { track, .. }
            | Self::RemoveFromPlaylist { track, .. }
            | Self::Skip { track, .. } => track,
        }
    }

    /// Whether this action writes to the target catalog
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Skip { .. })
    }
}

/// Reads as a verb phrase: "apply rating 4.0 to ...", "add ... to playlist 'x'"
impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplyRating {
                track,
                rating,
                previous,
            } => match previous {
                Some(previous) => write!(f, "apply rating {rating} to \"{track}\" (was {previous})"),
                None => write!(f, "apply rating {rating} to \"{track}\" (was unrated)"),
            },
            Self::AddToPlaylist { track, playlist } => {
                write!(f, "add \"{track}\" to playlist '{playlist}'")
            }
            Self::RemoveFromPlaylist { track, playlist } => {
                write!(f, "remove \"{track}\" from playlist '{playlist}'")
            }
            Self::Skip { track, reason } => write!(f, "skip \"{track}\" ({reason})"),
        }
    }
}

/// Matching statistics collected while planning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanStats {
    pub source_tracks: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub unidentifiable: usize,
    pub duplicates: usize,
    /// Source tracks whose rating equals the previous run's
    pub unchanged: usize,
}

/// A source track and the target track it was matched to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPair {
    pub source: TrackId,
    pub target: TrackId,
    pub score: f64,
}

/// Ordered actions for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncPlan {
    pub direction: SyncDirection,
    pub actions: Vec<SyncAction>,
    /// Accepted matches in source enumeration order
    pub matches: Vec<MatchedPair>,
    pub stats: PlanStats,
}

impl SyncPlan {
    /// Actions that write to the target catalog
    pub fn writes(&self) -> impl Iterator<Item = &SyncAction> {
        self.actions.iter().filter(|action| action.is_write())
    }

    /// Skip actions with their reasons
    pub fn skips(&self) -> impl Iterator<Item = (&Track, SkipReason)> {
        self.actions.iter().filter_map(|action| match action {
            SyncAction::Skip { track, reason } => Some((track, *reason)),
            _ => None,
        })
    }
}

/// Outcome of executing a plan
#[derive(Debug, Default)]
pub struct ExecutionSummary {
    /// Whether writes were suppressed
    pub dry_run: bool,
    /// Write actions applied (or, in a dry run, that would have been applied)
    pub applied: usize,
    /// Skip actions recorded
    pub skipped: usize,
    /// Write actions that failed
    pub failed: usize,
    /// Actions left unprocessed after cancellation
    pub not_attempted: usize,
    /// Whether execution stopped early
    pub cancelled: bool,
    /// Every failure with its reason, in execution order
    pub failures: Vec<ActionExecutionError>,
}

/// Full report of one sync run
#[derive(Debug)]
pub struct SyncReport {
    pub session_id: String,
    pub started_at: String,
    pub completed_at: String,
    pub duration_seconds: u64,
    pub direction: SyncDirection,
    pub source_name: String,
    pub target_name: String,
    pub plan: SyncPlan,
    pub summary: ExecutionSummary,
    /// Source ratings at the start of the run, for the next incremental run
    pub source_ratings: RatingHistory,
}
