//! Copies a profile manifest between a browser profile and its backup folder.

use crate::fs::copy::copy_entry;
use crate::fs::provision::DirectoryProvisioner;
use crate::profile::{Browser, BrowserTarget, Manifest};
use crate::sync::retry::RetryExecutor;
use crate::utils::errors::BackupError;
use serde::Serialize;
use std::io;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Profile -> backup
    ToBackup,
    /// Backup -> profile
    FromBackup,
}

impl Direction {
    pub fn verb(&self) -> &'static str {
        match self {
            Direction::ToBackup => "backup",
            Direction::FromBackup => "restore",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Succeeded,
    Failed,
    /// Nothing was attempted and that is not an error
    Skipped,
}

/// Result of one step for one user and browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub user: String,
    pub browser: Browser,
    pub status: OutcomeStatus,
    pub reason: Option<String>,
    /// Manifest entries copied
    pub copied: usize,
}

impl SyncOutcome {
    pub fn succeeded(user: &str, browser: Browser, copied: usize) -> Self {
        Self {
            user: user.to_string(),
            browser,
            status: OutcomeStatus::Succeeded,
            reason: None,
            copied,
        }
    }

    pub fn failed(user: &str, browser: Browser, reason: impl Into<String>) -> Self {
        Self {
            user: user.to_string(),
            browser,
            status: OutcomeStatus::Failed,
            reason: Some(reason.into()),
            copied: 0,
        }
    }

    pub fn skipped(user: &str, browser: Browser, reason: impl Into<String>) -> Self {
        Self {
            user: user.to_string(),
            browser,
            status: OutcomeStatus::Skipped,
            reason: Some(reason.into()),
            copied: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Succeeded
    }
}

pub const REASON_SOURCE_MISSING: &str = "source missing";

/// Copies one manifest entry, returning the bytes written.
pub type CopyFn = fn(&Path, &Path) -> io::Result<u64>;

/// Moves one browser profile's manifest in one direction.
pub struct ProfileSyncer<'a> {
    retry: &'a RetryExecutor,
    provisioner: DirectoryProvisioner,
    manifest: &'a Manifest,
    copy: CopyFn,
}

impl<'a> ProfileSyncer<'a> {
    pub fn new(retry: &'a RetryExecutor, manifest: &'a Manifest) -> Self {
        Self {
            retry,
            provisioner: DirectoryProvisioner::new(),
            manifest,
            copy: copy_entry,
        }
    }

    /// Replace the per-entry copy operation.
    pub fn with_copy(mut self, copy: CopyFn) -> Self {
        self.copy = copy;
        self
    }

    /// Copy every manifest entry present in the source to the destination.
    ///
    /// Entries missing from the source are skipped. A failed entry marks
    /// the outcome failed but the remaining entries are still attempted.
    pub fn sync(&self, target: &BrowserTarget, direction: Direction) -> SyncOutcome {
        let (source, destination) = match direction {
            Direction::ToBackup => (&target.profile_dir, &target.backup_dir),
            Direction::FromBackup => (&target.backup_dir, &target.profile_dir),
        };

        if !source.is_dir() {
            warn!(
                user = %target.user,
                browser = %target.browser,
                path = %source.display(),
                "Source directory missing, nothing to {}",
                direction.verb()
            );
            return SyncOutcome::failed(&target.user, target.browser, REASON_SOURCE_MISSING);
        }

        let provisioned = self.retry.execute("create destination", || {
            self.provisioner.ensure(destination)
        });
        if !provisioned {
            return SyncOutcome::failed(
                &target.user,
                target.browser,
                format!("could not create {}", destination.display()),
            );
        }

        let mut copied = 0;
        let mut failed = Vec::new();

        for name in self.manifest.entries() {
            let src = source.join(name);
            if !src.exists() {
                continue;
            }
            if self.copy_with_retry(&src, &destination.join(name)) {
                copied += 1;
            } else {
                failed.push(name);
            }
        }

        if failed.is_empty() {
            info!(
                user = %target.user,
                browser = %target.browser,
                copied,
                "{} complete",
                direction.verb()
            );
            SyncOutcome::succeeded(&target.user, target.browser, copied)
        } else {
            SyncOutcome {
                copied,
                ..SyncOutcome::failed(
                    &target.user,
                    target.browser,
                    format!("failed to copy: {}", failed.join(", ")),
                )
            }
        }
    }

    fn copy_with_retry(&self, src: &Path, dest: &Path) -> bool {
        let op_name = format!("copy {}", src.display());
        self.retry.execute(&op_name, || {
            (self.copy)(src, dest).map_err(BackupError::from)
        })
    }
}
