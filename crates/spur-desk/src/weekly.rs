//! The end-of-week pass over every active investigation.

use serde::{Deserialize, Serialize};

use spur_core::InvestigationId;

use crate::desk::Desk;
use crate::notify::Notifier;
use crate::outcome::Outcome;

/// What one week did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekReport {
    /// Week number after the run.
    pub week: u32,
    /// Investigations looked at, including ones staff resolved.
    pub processed: usize,
    /// Automatic successes.
    pub successes: usize,
    /// Automatic failures, with or without progress.
    pub failures: usize,
    /// Investigations that could not be processed, with the reason.
    pub errors: Vec<(InvestigationId, String)>,
}

/// Runs the week.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeeklyCycle;

impl WeeklyCycle {
    /// Process every active, ongoing investigation, oldest first, then
    /// advance the week.
    ///
    /// One investigation failing does not stop the others. Cached costs are
    /// dropped afterwards since sheets tend to change between weeks.
    pub fn run<N: Notifier>(desk: &mut Desk<N>) -> WeekReport {
        let due: Vec<InvestigationId> = desk
            .store()
            .investigations()
            .into_iter()
            .filter(|inv| inv.active && inv.ongoing)
            .map(|inv| inv.id)
            .collect();
        tracing::info!(week = desk.week() + 1, due = due.len(), "processing week");

        let mut report = WeekReport::default();
        for id in due {
            report.processed += 1;
            match desk.process_events(id) {
                Ok(Outcome::Success { .. }) => report.successes += 1,
                Ok(Outcome::FailureWithProgress { .. } | Outcome::FailureNoProgress) => {
                    report.failures += 1;
                }
                Ok(Outcome::GmResolved) => {}
                Err(err) => {
                    tracing::warn!(investigation = %id, %err, "investigation not processed");
                    report.errors.push((id, err.to_string()));
                }
            }
        }
        desk.advance_week();
        desk.invalidate_costs(None);
        report.week = desk.week();
        tracing::info!(
            week = report.week,
            successes = report.successes,
            failures = report.failures,
            errors = report.errors.len(),
            "week done"
        );
        report
    }
}
