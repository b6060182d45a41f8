/// Human readable run summary
use plexsync_engine::SyncReport;
use std::fmt;

/// Render the end-of-run summary printed to stdout
pub fn render(report: &SyncReport) -> String {
    Summary(report).to_string()
}

struct Summary<'a>(&'a SyncReport);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let summary = &report.summary;

        let marker = if summary.dry_run { " [dry run]" } else { "" };
        writeln!(f, "Sync {}{}", report.direction, marker)?;
        writeln!(f, "  Source: {}", report.source_name)?;
        writeln!(f, "  Target: {}", report.target_name)?;

        let stats = &report.plan.stats;
        writeln!(
            f,
            "  Matched {} of {} source tracks ({} unmatched, {} unidentifiable, {} duplicates)",
            stats.matched, stats.source_tracks, stats.unmatched, stats.unidentifiable, stats.duplicates
        )?;
        if stats.unchanged > 0 {
            writeln!(f, "  Unchanged since last run: {}", stats.unchanged)?;
        }

        let applied_label = if summary.dry_run { "Would apply" } else { "Applied" };
        writeln!(
            f,
            "  {}: {}  Skipped: {}  Failed: {}",
            applied_label, summary.applied, summary.skipped, summary.failed
        )?;
        if summary.cancelled {
            writeln!(f, "  Cancelled: {} actions not attempted", summary.not_attempted)?;
        }
        writeln!(f, "  Duration: {}s", report.duration_seconds)?;

        let mut skips = report.plan.skips().peekable();
        if skips.peek().is_some() {
            writeln!(f, "\nSkipped:")?;
            for (track, reason) in skips {
                writeln!(f, "  - {track} ({reason})")?;
            }
        }

        if !summary.failures.is_empty() {
            writeln!(f, "\nFailed:")?;
            for failure in &summary.failures {
                writeln!(f, "  - {failure}")?;
            }
        }

        Ok(())
    }
}
