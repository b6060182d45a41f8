use crate::{
    error::{EngineError, Result},
    executor::SyncExecutor,
    history::RatingHistory,
    options::{MatchConfig, SyncDirection, SyncOptions},
    planner::SyncPlanner,
    types::SyncReport,
};
use plexsync_core::{Catalog, CatalogReader, CatalogSnapshot};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Runs one enumerate, plan, execute cycle between a local and a remote catalog
pub struct SyncManager {
    planner: SyncPlanner,
    executor: SyncExecutor,
    history: Option<RatingHistory>,
}

impl SyncManager {
    /// Create a manager, validating the match configuration up front
    ///
    /// # Errors
    /// Returns `EngineError::Config` if the match configuration is unusable
    pub fn new(options: SyncOptions, match_config: MatchConfig) -> Result<Self> {
        match_config.validate()?;
        let executor = SyncExecutor::new(options.dry_run);

        Ok(Self {
            planner: SyncPlanner::new(options, match_config),
            executor,
            history: None,
        })
    }

    /// Stop executing actions once `flag` is set
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.executor = self.executor.with_cancellation(flag);
        self
    }

    /// Only propagate ratings that changed since `history` was recorded
    pub fn with_history(mut self, history: RatingHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn options(&self) -> &SyncOptions {
        self.planner.options()
    }

    /// Synchronize in the configured direction.
    ///
    /// Only catalog read failures abort the run; failed writes are reported in the
    /// summary.
    pub fn run(&self, local: &mut dyn Catalog, remote: &mut dyn Catalog) -> Result<SyncReport> {
        let start_time = Instant::now();
        let started_at = chrono::Utc::now().to_rfc3339();
        let session_id = Uuid::new_v4().to_string();
        let options = self.planner.options();
        let direction = options.direction;

        info!(
            "Starting sync {} ({}{}{})",
            session_id,
            direction,
            if options.dry_run { ", dry run" } else { "" },
            if self.history.is_some() { ", incremental" } else { "" }
        );

        // Phase 1: Snapshots
        debug!("Phase 1: Reading catalogs");
        let local_snapshot = read_snapshot(&*local)?;
        let remote_snapshot = read_snapshot(&*remote)?;

        // Phase 2: Planning
        debug!("Phase 2: Planning");
        let plan = self.planner.plan_since(
            &local_snapshot,
            &remote_snapshot,
            direction,
            self.history.as_ref(),
        );
        let source_ratings = RatingHistory::capture(match direction {
            SyncDirection::LocalToRemote => &local_snapshot,
            SyncDirection::RemoteToLocal => &remote_snapshot,
        });

        // Phase 3: Execution
        debug!("Phase 3: Executing {} actions", plan.actions.len());
        let (source_name, target_name) = match direction {
            SyncDirection::LocalToRemote => (local.name().to_string(), remote.name().to_string()),
            SyncDirection::RemoteToLocal => (remote.name().to_string(), local.name().to_string()),
        };
        let summary = match direction {
            SyncDirection::LocalToRemote => self.executor.execute(&plan, remote),
            SyncDirection::RemoteToLocal => self.executor.execute(&plan, local),
        };

        let report = SyncReport {
            session_id,
            started_at,
            completed_at: chrono::Utc::now().to_rfc3339(),
            duration_seconds: start_time.elapsed().as_secs(),
            direction,
            source_name,
            target_name,
            plan,
            summary,
            source_ratings,
        };

        info!(
            "Sync complete: {} applied, {} skipped, {} failed in {}s",
            report.summary.applied,
            report.summary.skipped,
            report.summary.failed,
            report.duration_seconds
        );

        Ok(report)
    }
}

fn read_snapshot(catalog: &dyn Catalog) -> Result<CatalogSnapshot> {
    let snapshot = catalog.snapshot().map_err(|e| {
        error!("Reading {} failed: {}", catalog.name(), e);
        EngineError::catalog(catalog.name(), e)
    })?;

    info!(
        "Read {}: {} tracks, {} playlists",
        catalog.name(),
        snapshot.tracks.len(),
        snapshot.playlists.len()
    );
    Ok(snapshot)
}
