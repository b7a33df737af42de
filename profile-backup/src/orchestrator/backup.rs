//! Backup: local browser profiles -> per-host folder on the share.

use crate::fs::health::PathHealthChecker;
use crate::fs::provision::DirectoryProvisioner;
use crate::orchestrator::ledger::{Ledger, Step};
use crate::orchestrator::RunContext;
use crate::profile::{Browser, BrowserTarget};
use crate::sync::syncer::{Direction, ProfileSyncer};
use crate::utils::errors::{BackupError, Result};
use tracing::{info, info_span, warn};

pub struct BackupOrchestrator<'a> {
    ctx: &'a RunContext,
    health: PathHealthChecker,
}

impl<'a> BackupOrchestrator<'a> {
    pub fn new(ctx: &'a RunContext) -> Self {
        Self {
            ctx,
            health: PathHealthChecker::new(),
        }
    }

    /// Back up every discovered user's Chrome and Edge profiles.
    ///
    /// Only the run-level preconditions return an error. Everything else is
    /// recorded in the returned ledger.
    pub fn run(&self) -> Result<Ledger> {
        let ctx = self.ctx;

        if !ctx.share_root.is_dir() {
            return Err(BackupError::BackupRootUnreachable(ctx.share_root.clone()));
        }
        if !ctx.users_root.is_dir() {
            return Err(BackupError::UsersRootUnreachable(ctx.users_root.clone()));
        }

        let users = ctx.discover_users(&ctx.users_root)?;
        info!(count = users.len(), "Discovered users to back up");

        let backup_root = ctx.backup_root();
        let provisioner = DirectoryProvisioner::new();
        if !ctx
            .retry
            .execute("create host backup root", || provisioner.ensure(&backup_root))
        {
            return Err(BackupError::BackupRootUnreachable(backup_root));
        }

        let syncer = ProfileSyncer::new(&ctx.retry, &ctx.manifest);
        let mut ledger = Ledger::new();

        for user in &users {
            let _span = info_span!("user", user = %user).entered();

            for browser in Browser::ALL {
                let target = BrowserTarget::new(browser, user, &ctx.users_root, &backup_root);

                let health = self.health.probe(&target.profile_dir);
                let outcome = match ctx.gate(user, browser, health) {
                    Some(outcome) => {
                        warn!(
                            browser = %browser,
                            path = %target.profile_dir.display(),
                            reason = outcome.reason.as_deref().unwrap_or_default(),
                            "Profile not usable, skipping backup"
                        );
                        outcome
                    }
                    None => syncer.sync(&target, Direction::ToBackup),
                };

                ledger.record(Step::Sync, &outcome);
            }
        }

        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingProfilePolicy;
    use crate::orchestrator::testutil::context;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn layout(temp_dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        let users = temp_dir.path().join("Users");
        let share = temp_dir.path().join("share");
        fs::create_dir_all(&users).unwrap();
        fs::create_dir_all(&share).unwrap();
        (users, share)
    }

    fn profile(users: &Path, user: &str, browser: Browser) -> std::path::PathBuf {
        let dir = browser.profile_dir(users, user);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_backup_alice_chrome() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (users, share) = layout(&temp_dir);
        let chrome = profile(&users, "alice", Browser::Chrome);
        fs::write(chrome.join("Bookmarks"), b"{}")?;
        fs::write(chrome.join("Cookies"), b"c")?;

        let mut ctx = context(&users, &share);
        ctx.missing_profile = MissingProfilePolicy::Skip;
        let ledger = BackupOrchestrator::new(&ctx).run()?;

        let backup_dir = share.join("12-PC/alice/Chrome");
        assert!(backup_dir.is_dir());
        assert_eq!(fs::read_dir(&backup_dir)?.count(), 2);
        assert!(ledger.succeeded(Browser::Chrome, Step::Sync).contains("alice"));
        assert!(ledger.skipped(Browser::Edge, Step::Sync).contains("alice"));
        assert!(ledger.fully_successful().contains("alice"));
        Ok(())
    }

    #[test]
    fn test_missing_profile_fails_by_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (users, share) = layout(&temp_dir);
        let chrome = profile(&users, "alice", Browser::Chrome);
        fs::write(chrome.join("Bookmarks"), b"{}")?;

        let ctx = context(&users, &share);
        let ledger = BackupOrchestrator::new(&ctx).run()?;

        assert!(ledger.succeeded(Browser::Chrome, Step::Sync).contains("alice"));
        assert!(ledger.failed(Browser::Edge, Step::Sync).contains("alice"));
        assert!(!ledger.fully_successful().contains("alice"));
        assert!(!share.join("12-PC/alice/Edge").exists());
        Ok(())
    }

    #[test]
    fn test_unreadable_edge_profile_is_failed_without_copy() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (users, share) = layout(&temp_dir);
        let chrome = profile(&users, "bob", Browser::Chrome);
        fs::write(chrome.join("History"), b"h")?;
        // Edge "Default" exists but cannot be enumerated.
        let edge = Browser::Edge.profile_dir(&users, "bob");
        fs::create_dir_all(edge.parent().unwrap())?;
        fs::write(&edge, b"not a directory")?;

        let ctx = context(&users, &share);
        let ledger = BackupOrchestrator::new(&ctx).run()?;

        assert!(ledger.failed(Browser::Edge, Step::Sync).contains("bob"));
        assert!(!share.join("12-PC/bob/Edge").exists());
        assert!(ledger.succeeded(Browser::Chrome, Step::Sync).contains("bob"));
        assert!(ledger.failures()[0].reason.contains("unreadable"));
        Ok(())
    }

    #[test]
    fn test_unreachable_share_is_fatal() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (users, _) = layout(&temp_dir);
        profile(&users, "alice", Browser::Chrome);

        let ctx = context(&users, &temp_dir.path().join("offline"));
        let err = BackupOrchestrator::new(&ctx).run().unwrap_err();
        assert!(matches!(err, BackupError::BackupRootUnreachable(_)));
        Ok(())
    }

    #[test]
    fn test_no_users_is_fatal() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (users, share) = layout(&temp_dir);
        fs::create_dir_all(users.join("Public"))?;

        let ctx = context(&users, &share);
        let err = BackupOrchestrator::new(&ctx).run().unwrap_err();
        assert!(matches!(err, BackupError::NoUsersFound(_)));
        assert!(!share.join("12-PC").exists());
        Ok(())
    }
}
