//! PlexSync Engine
//!
//! Reconciles ratings and playlist membership between two catalogs.
//!
//! # Architecture
//!
//! - `fingerprint`: normalized identity key derived from track metadata
//! - `matcher`: fuzzy scoring and best-candidate selection
//! - `history`: source ratings remembered between runs for incremental syncs
//! - `planner`: turns two catalog snapshots into an ordered list of `SyncAction`s
//! - `executor`: applies (or previews) actions against a `CatalogWriter`
//! - `manager`: runs one enumerate, plan, execute cycle and reports on it

mod error;
mod options;
mod types;

pub mod executor;
pub mod fingerprint;
pub mod history;
pub mod manager;
pub mod matcher;
pub mod planner;

pub use error::{ActionExecutionError, ConfigError, EngineError, Result, UnidentifiableTrackError};
pub use executor::SyncExecutor;
pub use fingerprint::TrackFingerprint;
pub use history::RatingHistory;
pub use manager::SyncManager;
pub use matcher::{DurationAgreement, MatchCandidate, MatchEngine, MatchResult, ScoreBreakdown};
pub use options::{ConflictPolicy, MatchConfig, SyncDirection, SyncItem, SyncOptions};
pub use planner::SyncPlanner;
pub use types::{ExecutionSummary, MatchedPair, PlanStats, SkipReason, SyncAction, SyncPlan, SyncReport};
