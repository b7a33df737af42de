//! Per-run record of which users succeeded, failed or were skipped for each
//! browser and step.

use crate::profile::Browser;
use crate::sync::syncer::{OutcomeStatus, SyncOutcome};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Copying the manifest (backup or restore)
    Sync,
    /// Resetting permissions on a restored profile
    PermissionReset,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Sync => f.write_str("sync"),
            Step::PermissionReset => f.write_str("permission reset"),
        }
    }
}

/// Users per outcome for one browser and step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub succeeded: BTreeSet<String>,
    pub failed: BTreeSet<String>,
    pub skipped: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: BTreeMap<(Browser, Step), StepRecord>,
    /// Failure reasons in the order they were recorded
    failures: Vec<FailureNote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureNote {
    pub user: String,
    pub browser: Browser,
    pub step: Step,
    pub reason: String,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of `step` for the outcome's user and browser.
    pub fn record(&mut self, step: Step, outcome: &SyncOutcome) {
        let record = self.records.entry((outcome.browser, step)).or_default();
        let user = outcome.user.clone();
        match outcome.status {
            OutcomeStatus::Succeeded => {
                record.succeeded.insert(user);
            }
            OutcomeStatus::Failed => {
                record.failed.insert(user);
                self.failures.push(FailureNote {
                    user: outcome.user.clone(),
                    browser: outcome.browser,
                    step,
                    reason: outcome.reason.clone().unwrap_or_default(),
                });
            }
            OutcomeStatus::Skipped => {
                record.skipped.insert(user);
            }
        }
    }

    pub fn record_failure(&mut self, step: Step, user: &str, browser: Browser, reason: &str) {
        self.record(step, &SyncOutcome::failed(user, browser, reason));
    }

    pub fn get(&self, browser: Browser, step: Step) -> Option<&StepRecord> {
        self.records.get(&(browser, step))
    }

    pub fn succeeded(&self, browser: Browser, step: Step) -> BTreeSet<String> {
        self.get(browser, step)
            .map(|r| r.succeeded.clone())
            .unwrap_or_default()
    }

    pub fn failed(&self, browser: Browser, step: Step) -> BTreeSet<String> {
        self.get(browser, step)
            .map(|r| r.failed.clone())
            .unwrap_or_default()
    }

    pub fn skipped(&self, browser: Browser, step: Step) -> BTreeSet<String> {
        self.get(browser, step)
            .map(|r| r.skipped.clone())
            .unwrap_or_default()
    }

    /// All (browser, step) records, in browser then step order.
    pub fn records(&self) -> impl Iterator<Item = (Browser, Step, &StepRecord)> {
        self.records.iter().map(|((b, s), r)| (*b, *s, r))
    }

    pub fn failures(&self) -> &[FailureNote] {
        &self.failures
    }

    /// Users with at least one succeeded step and no failed step anywhere.
    pub fn fully_successful(&self) -> BTreeSet<String> {
        let failed: BTreeSet<&String> = self.records.values().flat_map(|r| &r.failed).collect();
        self.records
            .values()
            .flat_map(|r| &r.succeeded)
            .filter(|user| !failed.contains(user))
            .cloned()
            .collect()
    }

    /// Every user that appears in any record.
    pub fn users(&self) -> BTreeSet<String> {
        self.records
            .values()
            .flat_map(|r| r.succeeded.iter().chain(&r.failed).chain(&r.skipped))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(user: &str, browser: Browser) -> SyncOutcome {
        SyncOutcome::succeeded(user, browser, 1)
    }

    #[test]
    fn test_fully_successful_requires_no_failures() {
        let mut ledger = Ledger::new();
        ledger.record(Step::Sync, &ok("alice", Browser::Chrome));
        ledger.record(Step::Sync, &ok("alice", Browser::Edge));
        ledger.record(Step::Sync, &ok("bob", Browser::Chrome));
        ledger.record(Step::Sync, &SyncOutcome::failed("bob", Browser::Edge, "copy failed"));

        let full = ledger.fully_successful();
        assert!(full.contains("alice"));
        assert!(!full.contains("bob"));
        assert_eq!(ledger.failed(Browser::Edge, Step::Sync).len(), 1);
    }

    #[test]
    fn test_one_failed_step_removes_user() {
        let mut ledger = Ledger::new();
        ledger.record(Step::Sync, &ok("carol", Browser::Chrome));
        ledger.record(Step::Sync, &ok("carol", Browser::Edge));
        ledger.record(Step::PermissionReset, &ok("carol", Browser::Chrome));
        assert!(ledger.fully_successful().contains("carol"));

        ledger.record_failure(Step::PermissionReset, "carol", Browser::Edge, "icacls exited 5");
        assert!(!ledger.fully_successful().contains("carol"));
        assert_eq!(ledger.failures()[0].step, Step::PermissionReset);
    }

    #[test]
    fn test_skipped_is_neither_success_nor_failure() {
        let mut ledger = Ledger::new();
        ledger.record(Step::Sync, &ok("dan", Browser::Chrome));
        ledger.record(Step::Sync, &SyncOutcome::skipped("dan", Browser::Edge, "no profile"));
        ledger.record(Step::Sync, &SyncOutcome::skipped("eve", Browser::Edge, "no profile"));

        let full = ledger.fully_successful();
        assert!(full.contains("dan"));
        assert!(!full.contains("eve"));
        assert!(ledger.failures().is_empty());
        assert_eq!(ledger.users().len(), 2);
    }

    #[test]
    fn test_duplicates_are_coalesced() {
        let mut ledger = Ledger::new();
        ledger.record(Step::Sync, &ok("alice", Browser::Chrome));
        ledger.record(Step::Sync, &ok("alice", Browser::Chrome));
        ledger.record(Step::Sync, &ok("alice", Browser::Edge));

        assert_eq!(ledger.succeeded(Browser::Chrome, Step::Sync).len(), 1);
        assert_eq!(ledger.fully_successful().len(), 1);
    }
}
