//! Destination directory creation.

use crate::utils::errors::{BackupError, Result};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    Created,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryProvisioner;

impl DirectoryProvisioner {
    pub fn new() -> Self {
        Self
    }

    /// Make sure `path` is a directory, creating it and any missing parents.
    ///
    /// Calling this again on the same path is a no-op. A non-directory
    /// already sitting at `path` is an error.
    pub fn ensure(&self, path: &Path) -> Result<Provisioned> {
        match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => return Ok(Provisioned::AlreadyPresent),
            Ok(_) => return Err(BackupError::NotADirectory(path.to_path_buf())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        std::fs::create_dir_all(path)?;
        info!(path = %path.display(), "Created directory");
        Ok(Provisioned::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_creates_missing_ancestors() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("share/12-PC/alice/Chrome");

        assert_eq!(DirectoryProvisioner::new().ensure(&path)?, Provisioned::Created);
        assert!(path.is_dir());
        Ok(())
    }

    #[test]
    fn test_ensure_is_idempotent() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("Edge");
        let provisioner = DirectoryProvisioner::new();

        assert_eq!(provisioner.ensure(&path)?, Provisioned::Created);
        assert_eq!(provisioner.ensure(&path)?, Provisioned::AlreadyPresent);
        Ok(())
    }

    #[test]
    fn test_ensure_rejects_file_in_the_way() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("Chrome");
        std::fs::write(&path, b"not a folder")?;

        let err = DirectoryProvisioner::new().ensure(&path).unwrap_err();
        assert!(matches!(err, BackupError::NotADirectory(_)));
        Ok(())
    }
}
