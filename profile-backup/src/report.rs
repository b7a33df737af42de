//! End-of-run summary.

use crate::orchestrator::ledger::{FailureNote, Ledger, Step};
use crate::profile::Browser;
use crate::sync::syncer::Direction;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Users for one browser and step, as reported.
#[derive(Debug, Clone, Serialize)]
pub struct StepSummary {
    pub browser: Browser,
    pub step: Step,
    pub succeeded: BTreeSet<String>,
    pub failed: BTreeSet<String>,
    pub skipped: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub run_id: Uuid,
    pub host: String,
    pub direction: Direction,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub fully_successful: BTreeSet<String>,
    pub steps: Vec<StepSummary>,
    pub failures: Vec<FailureNote>,
}

impl Summary {
    pub fn from_ledger(
        ledger: &Ledger,
        run_id: Uuid,
        host: &str,
        direction: Direction,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id,
            host: host.to_string(),
            direction,
            started_at,
            finished_at: Utc::now(),
            fully_successful: ledger.fully_successful(),
            steps: ledger
                .records()
                .map(|(browser, step, record)| StepSummary {
                    browser,
                    step,
                    succeeded: record.succeeded.clone(),
                    failed: record.failed.clone(),
                    skipped: record.skipped.clone(),
                })
                .collect(),
            failures: ledger.failures().to_vec(),
        }
    }

    /// Human-readable lines. Each list appears only when it has members.
    pub fn lines(&self) -> Vec<String> {
        let verb = self.direction.verb();
        let mut lines = Vec::new();

        if !self.fully_successful.is_empty() {
            lines.push(format!(
                "Successful {verb}: {}",
                join(&self.fully_successful)
            ));
        }

        for step in &self.steps {
            let label = match step.step {
                Step::Sync => format!("{} {verb}", step.browser),
                Step::PermissionReset => format!("{} permission reset", step.browser),
            };
            if !step.failed.is_empty() {
                lines.push(format!("{label} failed: {}", join(&step.failed)));
            }
            if !step.skipped.is_empty() {
                lines.push(format!("{label} skipped: {}", join(&step.skipped)));
            }
        }

        lines
    }
}

fn join(users: &BTreeSet<String>) -> String {
    users.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::syncer::SyncOutcome;

    fn summary(ledger: &Ledger, direction: Direction) -> Summary {
        Summary::from_ledger(ledger, Uuid::new_v4(), "12-PC", direction, Utc::now())
    }

    #[test]
    fn test_lines_only_for_non_empty_lists() {
        let mut ledger = Ledger::new();
        ledger.record(Step::Sync, &SyncOutcome::succeeded("alice", Browser::Chrome, 2));
        ledger.record(Step::Sync, &SyncOutcome::succeeded("alice", Browser::Edge, 1));

        let lines = summary(&ledger, Direction::ToBackup).lines();
        assert_eq!(lines, vec!["Successful backup: alice".to_string()]);
    }

    #[test]
    fn test_lines_list_failures_per_browser_and_step() {
        let mut ledger = Ledger::new();
        ledger.record(Step::Sync, &SyncOutcome::succeeded("alice", Browser::Chrome, 2));
        ledger.record(Step::Sync, &SyncOutcome::succeeded("bob", Browser::Chrome, 2));
        ledger.record_failure(Step::Sync, "carol", Browser::Edge, "insufficient disk space");
        ledger.record_failure(Step::PermissionReset, "bob", Browser::Chrome, "exit 5");

        let lines = summary(&ledger, Direction::FromBackup).lines();
        assert_eq!(
            lines,
            vec![
                "Successful restore: alice".to_string(),
                "Chrome permission reset failed: bob".to_string(),
                "Edge restore failed: carol".to_string(),
            ]
        );
    }

    #[test]
    fn test_summary_serializes() {
        let mut ledger = Ledger::new();
        ledger.record(Step::Sync, &SyncOutcome::skipped("eve", Browser::Edge, "directory missing"));

        let json = serde_json::to_value(summary(&ledger, Direction::ToBackup)).unwrap();
        assert_eq!(json["host"], "12-PC");
        assert_eq!(json["direction"], "to_backup");
        assert_eq!(json["steps"][0]["skipped"][0], "eve");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0.00 B");
        assert_eq!(format_bytes(1023), "1023.00 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(12 * 1024 * 1024 * 1024), "12.00 GB");
    }
}
