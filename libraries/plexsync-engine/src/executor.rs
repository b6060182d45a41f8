//! Applies planned actions against a catalog writer

use crate::error::ActionExecutionError;
use crate::types::{ExecutionSummary, SyncAction, SyncPlan};
use plexsync_core::{CatalogWriter, Result as CatalogResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Executes a `SyncPlan` in order.
///
/// A failing action is recorded and execution continues with the next one.
#[derive(Debug, Clone, Default)]
pub struct SyncExecutor {
    dry_run: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl SyncExecutor {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            cancel: None,
        }
    }

    /// Stop between actions once `flag` is set
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run every action of the plan against `writer`.
    ///
    /// In a dry run the writer is never called and every write action is counted as
    /// applied.
    pub fn execute<W>(&self, plan: &SyncPlan, writer: &mut W) -> ExecutionSummary
    where
        W: CatalogWriter + ?Sized,
    {
        let mut summary = ExecutionSummary {
            dry_run: self.dry_run,
            ..ExecutionSummary::default()
        };

        for (position, action) in plan.actions.iter().enumerate() {
            if self.is_cancelled() {
                summary.cancelled = true;
                summary.not_attempted = plan.actions.len() - position;
                warn!(
                    "Cancelled, {} actions not attempted",
                    summary.not_attempted
                );
                break;
            }

            if let SyncAction::Skip { track, reason } = action {
                debug!(track = %track, %reason, "Skipped");
                summary.skipped += 1;
                continue;
            }

            if self.dry_run {
                info!("[dry run] Would {}", action);
                summary.applied += 1;
                continue;
            }

            match apply(action, writer) {
                Ok(()) => {
                    debug!("Applied: {}", action);
                    summary.applied += 1;
                }
                Err(source) => {
                    let error = ActionExecutionError {
                        action: action.clone(),
                        source,
                    };
                    warn!("{}", error);
                    summary.failed += 1;
                    summary.failures.push(error);
                }
            }
        }

        summary
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

fn apply<W>(action: &SyncAction, writer: &mut W) -> CatalogResult<()>
where
    W: CatalogWriter + ?Sized,
{
    match action {
        SyncAction::ApplyRating { track, rating, .. } => writer.write_rating(&track.id, *rating),
        SyncAction::AddToPlaylist { track, playlist } => writer.add_to_playlist(playlist, &track.id),
        SyncAction::RemoveFromPlaylist { track, playlist } => {
            writer.remove_from_playlist(playlist, &track.id)
        }
        SyncAction::Skip { .. } => Ok(()),
    }
}
