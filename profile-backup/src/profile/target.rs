//! Browsers and the per-user directories that belong to them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Browser {
    Chrome,
    Edge,
}

impl Browser {
    pub const ALL: [Browser; 2] = [Browser::Chrome, Browser::Edge];

    /// Folder name used under the user's backup directory.
    pub fn name(&self) -> &'static str {
        match self {
            Browser::Chrome => "Chrome",
            Browser::Edge => "Edge",
        }
    }

    /// `<Vendor>/<Browser>` below `AppData/Local`.
    fn vendor_dir(&self) -> &'static str {
        match self {
            Browser::Chrome => "Google",
            Browser::Edge => "Microsoft",
        }
    }

    /// `<usersRoot>/<user>/AppData/Local/<Vendor>/<Browser>/User Data/Default`
    pub fn profile_dir(&self, users_root: &Path, user: &str) -> PathBuf {
        users_root
            .join(user)
            .join("AppData")
            .join("Local")
            .join(self.vendor_dir())
            .join(self.name())
            .join("User Data")
            .join("Default")
    }

    /// `<backupRoot>/<user>/<Browser>`
    pub fn backup_dir(&self, backup_root: &Path, user: &str) -> PathBuf {
        backup_root.join(user).join(self.name())
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One user's profile for one browser, with both ends of the copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserTarget {
    pub user: String,
    pub browser: Browser,
    pub profile_dir: PathBuf,
    pub backup_dir: PathBuf,
}

impl BrowserTarget {
    pub fn new(browser: Browser, user: &str, users_root: &Path, backup_root: &Path) -> Self {
        Self {
            user: user.to_string(),
            browser,
            profile_dir: browser.profile_dir(users_root, user),
            backup_dir: browser.backup_dir(backup_root, user),
        }
    }
}
