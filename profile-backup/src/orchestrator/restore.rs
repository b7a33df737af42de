//! Restore: per-host folder on the share -> local browser profiles.

use crate::fs::health::{PathHealth, PathHealthChecker};
use crate::fs::walker::calculate_total_size;
use crate::orchestrator::ledger::{Ledger, Step};
use crate::orchestrator::RunContext;
use crate::platform::{PermissionResetter, SpaceProbe};
use crate::profile::{Browser, BrowserTarget};
use crate::report::format_bytes;
use crate::sync::syncer::{Direction, ProfileSyncer, SyncOutcome};
use crate::utils::errors::{BackupError, Result};
use std::path::Path;
use tracing::{error, info, info_span, warn};

pub struct RestoreOrchestrator<'a> {
    ctx: &'a RunContext,
    health: PathHealthChecker,
    space: &'a dyn SpaceProbe,
    permissions: &'a dyn PermissionResetter,
}

impl<'a> RestoreOrchestrator<'a> {
    pub fn new(
        ctx: &'a RunContext,
        space: &'a dyn SpaceProbe,
        permissions: &'a dyn PermissionResetter,
    ) -> Self {
        Self {
            ctx,
            health: PathHealthChecker::new(),
            space,
            permissions,
        }
    }

    /// Restore every user that has a folder under this host's backup root.
    pub fn run(&self) -> Result<Ledger> {
        let ctx = self.ctx;
        let backup_root = ctx.backup_root();

        match self.health.probe(&backup_root) {
            PathHealth::Healthy => {}
            PathHealth::Absent => return Err(BackupError::BackupRootUnreachable(backup_root)),
            PathHealth::Corrupted(e) => {
                error!(path = %backup_root.display(), error = %e, "Backup root is unreadable");
                return Err(BackupError::BackupRootCorrupted(backup_root));
            }
        }

        let users = ctx.discover_users(&backup_root)?;
        info!(count = users.len(), "Discovered users to restore");

        let syncer = ProfileSyncer::new(&ctx.retry, &ctx.manifest);
        let mut ledger = Ledger::new();

        for user in &users {
            let _span = info_span!("user", user = %user).entered();

            if let Err(reason) = self.check_user(user, &backup_root) {
                warn!(reason = %reason, "Skipping restore for user");
                for browser in Browser::ALL {
                    ledger.record_failure(Step::Sync, user, browser, &reason);
                }
                continue;
            }

            for browser in Browser::ALL {
                let target = BrowserTarget::new(browser, user, &ctx.users_root, &backup_root);

                let health = self.health.probe(&target.backup_dir);
                let outcome = match ctx.gate(user, browser, health) {
                    Some(outcome) => outcome,
                    None => syncer.sync(&target, Direction::FromBackup),
                };
                ledger.record(Step::Sync, &outcome);

                if outcome.is_success() {
                    let reset = match self.permissions.reset(&target.profile_dir) {
                        Ok(()) => SyncOutcome::succeeded(user, browser, 0),
                        Err(e) => {
                            warn!(browser = %browser, error = %e, "Permission reset failed");
                            SyncOutcome::failed(user, browser, e.to_string())
                        }
                    };
                    ledger.record(Step::PermissionReset, &reset);
                }
            }
        }

        Ok(ledger)
    }

    /// Per-user preconditions checked once before either browser.
    fn check_user(&self, user: &str, backup_root: &Path) -> std::result::Result<(), String> {
        let ctx = self.ctx;

        let local = ctx.users_root.join(user);
        if !local.is_dir() {
            return Err(format!("local profile {} missing", local.display()));
        }

        let mut required = 0u64;
        for browser in Browser::ALL {
            let dir = browser.backup_dir(backup_root, user);
            required += calculate_total_size(&dir)
                .map_err(|e| format!("could not size {}: {e}", dir.display()))?;
        }

        let available = self
            .space
            .available_bytes(&ctx.users_root)
            .map_err(|e| e.to_string())?;

        if required > available {
            return Err(format!(
                "insufficient disk space: need {}, have {}",
                format_bytes(required),
                format_bytes(available)
            ));
        }

        info!(
            required = %format_bytes(required),
            available = %format_bytes(available),
            "Disk space check passed"
        );
        Ok(())
    }
}
