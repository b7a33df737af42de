//! Operating system capabilities the restore flow depends on.
//!
//! Both are traits so the orchestrators can run against fakes in tests.

use crate::utils::errors::{BackupError, Result};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Free space on the volume holding a path.
pub trait SpaceProbe {
    fn available_bytes(&self, path: &Path) -> Result<u64>;
}

/// Resets access control on a restored profile directory.
pub trait PermissionResetter {
    fn reset(&self, path: &Path) -> Result<()>;
}

/// `statvfs`-backed free space query.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatvfsSpaceProbe;

impl SpaceProbe for StatvfsSpaceProbe {
    fn available_bytes(&self, path: &Path) -> Result<u64> {
        let stat = nix::sys::statvfs::statvfs(path)
            .map_err(|e| BackupError::SpaceQuery(format!("{}: {}", path.display(), e)))?;
        #[allow(clippy::unnecessary_cast)]
        let available = stat.blocks_available() as u64 * stat.fragment_size() as u64;
        debug!(path = %path.display(), available, "Queried free space");
        Ok(available)
    }
}

/// Runs an external command with `{path}` replaced by the profile directory.
#[derive(Debug, Clone)]
pub struct CommandPermissionResetter {
    argv: Vec<String>,
}

impl CommandPermissionResetter {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl PermissionResetter for CommandPermissionResetter {
    fn reset(&self, path: &Path) -> Result<()> {
        let Some((program, args)) = self.argv.split_first() else {
            return Ok(());
        };

        let path_str = path.to_string_lossy();
        let args: Vec<String> = args.iter().map(|a| a.replace("{path}", &path_str)).collect();

        info!(program = %program, path = %path.display(), "Resetting permissions");
        let status = Command::new(program)
            .args(&args)
            .status()
            .map_err(|e| BackupError::PermissionReset(format!("{program}: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(BackupError::PermissionReset(format!(
                "{program} exited with {status} for {}",
                path.display()
            )))
        }
    }
}
