//! Runs the syncer across every discovered user and browser.

pub mod backup;
pub mod ledger;
pub mod restore;

pub use backup::BackupOrchestrator;
pub use ledger::{Ledger, Step};
pub use restore::RestoreOrchestrator;

use crate::config::{Config, MissingProfilePolicy};
use crate::fs::health::PathHealth;
use crate::host::HostIdentity;
use crate::profile::{Browser, Manifest};
use crate::sync::retry::{RetryExecutor, RetryPolicy};
use crate::sync::syncer::SyncOutcome;
use crate::utils::errors::{BackupError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything a backup or restore run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub users_root: PathBuf,
    pub share_root: PathBuf,
    pub host: HostIdentity,
    pub excluded_users: Vec<String>,
    /// When non-empty, only these users are processed
    pub only_users: Vec<String>,
    pub missing_profile: MissingProfilePolicy,
    pub retry: RetryExecutor,
    pub manifest: Manifest,
}

impl RunContext {
    pub fn from_config(config: &Config, host: HostIdentity, only_users: Vec<String>) -> Self {
        Self {
            users_root: config.paths.users_root.clone(),
            share_root: config.paths.share_root.clone(),
            host,
            excluded_users: config.discovery.excluded_users.clone(),
            only_users,
            missing_profile: config.sync.missing_profile,
            retry: RetryExecutor::new(RetryPolicy::new(
                config.sync.max_attempts,
                config.sync.backoff(),
            )),
            manifest: Manifest::browser_profile(),
        }
    }

    /// `<share_root>/<hostname>`
    pub fn backup_root(&self) -> PathBuf {
        self.host.backup_root(&self.share_root)
    }

    fn is_selected(&self, user: &str) -> bool {
        let excluded = self
            .excluded_users
            .iter()
            .any(|e| e.eq_ignore_ascii_case(user));
        let selected = self.only_users.is_empty()
            || self.only_users.iter().any(|u| u.eq_ignore_ascii_case(user));
        !excluded && selected
    }

    /// Sorted user directory names under `root`, after exclusions and the
    /// user filter. An empty result is the fatal `NoUsersFound`.
    pub fn discover_users(&self, root: &Path) -> Result<Vec<String>> {
        let mut users = Vec::new();

        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if self.is_selected(&name) {
                users.push(name);
            } else {
                debug!(user = %name, "Skipping excluded account");
            }
        }

        users.sort();
        users.dedup();

        if users.is_empty() {
            return Err(BackupError::NoUsersFound(root.to_path_buf()));
        }
        Ok(users)
    }

    /// Turn a failed health probe into the outcome to record, or `None` if the
    /// directory can be used.
    fn gate(&self, user: &str, browser: Browser, health: PathHealth) -> Option<SyncOutcome> {
        match health {
            PathHealth::Healthy => None,
            PathHealth::Absent => Some(match self.missing_profile {
                MissingProfilePolicy::Fail => {
                    SyncOutcome::failed(user, browser, "directory missing")
                }
                MissingProfilePolicy::Skip => {
                    SyncOutcome::skipped(user, browser, "directory missing")
                }
            }),
            PathHealth::Corrupted(e) => Some(SyncOutcome::failed(
                user,
                browser,
                format!("directory unreadable: {e}"),
            )),
        }
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use std::time::Duration;

    pub fn context(users_root: &Path, share_root: &Path) -> RunContext {
        let mut config = Config::default();
        config.paths.users_root = users_root.to_path_buf();
        config.paths.share_root = share_root.to_path_buf();
        let mut ctx = RunContext::from_config(
            &config,
            HostIdentity::parse("12-PC", true).unwrap(),
            Vec::new(),
        );
        ctx.retry = RetryExecutor::new(RetryPolicy::new(3, Duration::ZERO));
        ctx
    }
}
