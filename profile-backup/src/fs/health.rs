//! Existence and readability probe for directories about to be used as a
//! copy source.
//!
//! This only detects access failures. It says nothing about whether the
//! contents are intact.

use std::path::Path;
use tracing::warn;

#[derive(Debug)]
pub enum PathHealth {
    /// Path does not exist
    Absent,
    /// Path exists but its children cannot be listed
    Corrupted(std::io::Error),
    Healthy,
}

impl PathHealth {
    /// Absent and unreadable directories are both unusable.
    pub fn is_corrupted(&self) -> bool {
        !matches!(self, PathHealth::Healthy)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PathHealthChecker;

impl PathHealthChecker {
    pub fn new() -> Self {
        Self
    }

    /// Classify `dir` by trying to enumerate its immediate children.
    pub fn probe(&self, dir: &Path) -> PathHealth {
        if !dir.exists() {
            return PathHealth::Absent;
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Directory cannot be enumerated");
                return PathHealth::Corrupted(e);
            }
        };

        for entry in entries {
            if let Err(e) = entry {
                warn!(path = %dir.display(), error = %e, "Directory enumeration failed");
                return PathHealth::Corrupted(e);
            }
        }

        PathHealth::Healthy
    }

    pub fn is_corrupted(&self, dir: &Path) -> bool {
        self.probe(dir).is_corrupted()
    }
}
