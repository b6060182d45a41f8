/// Rating history persisted between runs
use crate::error::{CliError, Result};
use plexsync_engine::{RatingHistory, SyncDirection, SyncItem, SyncOptions, SyncReport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Source ratings recorded by the last completed run in each direction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    local_to_remote: Option<RatingHistory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    remote_to_local: Option<RatingHistory>,
}

impl SyncState {
    /// Read the state file. A missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::State(format!("Failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| CliError::State(format!("Failed to parse {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CliError::State(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| CliError::State(format!("Failed to create {}: {e}", parent.display())))?;
        }
        fs::write(path, content)
            .map_err(|e| CliError::State(format!("Failed to write {}: {e}", path.display())))
    }

    pub fn history(&self, direction: SyncDirection) -> Option<&RatingHistory> {
        match direction {
            SyncDirection::LocalToRemote => self.local_to_remote.as_ref(),
            SyncDirection::RemoteToLocal => self.remote_to_local.as_ref(),
        }
    }

    /// Remember a report's source ratings when the run propagated all of them.
    ///
    /// Dry runs, cancelled runs, runs with failed writes and runs that did not sync
    /// ratings leave the state as it was. Returns whether the state changed.
    pub fn record(&mut self, report: &SyncReport, options: &SyncOptions) -> bool {
        let summary = &report.summary;
        if summary.dry_run
            || summary.cancelled
            || summary.failed > 0
            || !options.syncs(SyncItem::Tracks)
        {
            return false;
        }

        let slot = match report.direction {
            SyncDirection::LocalToRemote => &mut self.local_to_remote,
            SyncDirection::RemoteToLocal => &mut self.remote_to_local,
        };
        *slot = Some(report.source_ratings.clone());
        true
    }
}
