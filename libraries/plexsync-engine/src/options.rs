use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Kind of data to synchronize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncItem {
    /// Track ratings
    Tracks,
    /// Playlist membership
    Playlists,
}

impl SyncItem {
    /// Parse a list of item names, failing on the first unknown one
    pub fn parse_list<I, S>(items: I) -> Result<BTreeSet<SyncItem>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = items
            .into_iter()
            .map(|item| item.as_ref().parse())
            .collect::<Result<BTreeSet<_>, _>>()?;

        if parsed.is_empty() {
            return Err(ConfigError::NoSyncItems);
        }
        Ok(parsed)
    }
}

impl FromStr for SyncItem {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tracks" => Ok(Self::Tracks),
            "playlists" => Ok(Self::Playlists),
            _ => Err(ConfigError::UnknownSyncItem(s.to_string())),
        }
    }
}

impl fmt::Display for SyncItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tracks => write!(f, "tracks"),
            Self::Playlists => write!(f, "playlists"),
        }
    }
}

/// Which catalog is the source of truth for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncDirection {
    /// Local library is the source, the remote server is written
    #[default]
    LocalToRemote,
    /// Remote server is the source, the local library is written
    RemoteToLocal,
}

impl SyncDirection {
    /// Direction selected by the `--reverse` flag
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            Self::RemoteToLocal
        } else {
            Self::LocalToRemote
        }
    }

    /// The opposite direction
    pub fn reversed(self) -> Self {
        match self {
            Self::LocalToRemote => Self::RemoteToLocal,
            Self::RemoteToLocal => Self::LocalToRemote,
        }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalToRemote => write!(f, "local -> remote"),
            Self::RemoteToLocal => write!(f, "remote -> local"),
        }
    }
}

/// What to do when both sides carry different non-zero ratings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Overwrite the target with the source rating
    #[default]
    SourceWins,
    /// Leave the target rating alone and report the conflict
    PreserveTarget,
}

impl FromStr for ConflictPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "source-wins" | "source_wins" => Ok(Self::SourceWins),
            "preserve-target" | "preserve_target" => Ok(Self::PreserveTarget),
            _ => Err(ConfigError::UnknownConflictPolicy(s.to_string())),
        }
    }
}

/// Resolved options for one sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Record actions without writing to the target catalog
    pub dry_run: bool,
    /// Source of truth for this run
    pub direction: SyncDirection,
    /// What to synchronize
    pub sync_items: BTreeSet<SyncItem>,
    /// Rating conflict handling
    pub conflict_policy: ConflictPolicy,
}

impl SyncOptions {
    /// Whether the given item kind is part of this run
    pub fn syncs(&self, item: SyncItem) -> bool {
        self.sync_items.contains(&item)
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            direction: SyncDirection::default(),
            sync_items: BTreeSet::from([SyncItem::Tracks]),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

/// Tuning for the fuzzy track matcher.
///
/// Scores are on a 0-100 scale. The composite score is the weighted mean of the title
/// and artist similarities, adjusted by duration agreement when both durations are known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Weight of the title similarity (default: 0.6)
    pub title_weight: f64,

    /// Weight of the artist similarity (default: 0.4)
    pub artist_weight: f64,

    /// Durations this close count as agreeing (default: 2)
    pub duration_tolerance_seconds: u64,

    /// Points added when durations agree (default: 5)
    pub duration_bonus: f64,

    /// Durations further apart than this count as a mismatch (default: 10)
    pub duration_mismatch_seconds: u64,

    /// Highest score a duration mismatch can reach (default: 50)
    pub duration_mismatch_cap: f64,

    /// Minimum score for a candidate to be eligible, inclusive (default: 70)
    pub min_score: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            title_weight: 0.6,
            artist_weight: 0.4,
            duration_tolerance_seconds: 2,
            duration_bonus: 5.0,
            duration_mismatch_seconds: 10,
            duration_mismatch_cap: 50.0,
            min_score: 70.0,
        }
    }
}

impl MatchConfig {
    /// Check that weights and thresholds are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::InvalidMatchConfig(msg));

        for (name, weight) in [("title_weight", self.title_weight), ("artist_weight", self.artist_weight)] {
            if !weight.is_finite() || weight < 0.0 {
                return invalid(format!("{name} must be a non-negative number, got {weight}"));
            }
        }
        if self.title_weight + self.artist_weight <= 0.0 {
            return invalid("title_weight and artist_weight cannot both be zero".to_string());
        }
        for (name, score) in [
            ("min_score", self.min_score),
            ("duration_mismatch_cap", self.duration_mismatch_cap),
        ] {
            if !(0.0..=100.0).contains(&score) {
                return invalid(format!("{name} must be between 0 and 100, got {score}"));
            }
        }
        if !self.duration_bonus.is_finite() || self.duration_bonus < 0.0 {
            return invalid(format!(
                "duration_bonus must be a non-negative number, got {}",
                self.duration_bonus
            ));
        }
        if self.duration_tolerance_seconds > self.duration_mismatch_seconds {
            return invalid(format!(
                "duration_tolerance_seconds ({}) exceeds duration_mismatch_seconds ({})",
                self.duration_tolerance_seconds, self.duration_mismatch_seconds
            ));
        }
        Ok(())
    }
}
