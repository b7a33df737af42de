//! Error types for profile backup and restore.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Invalid host identity: {0}")]
    InvalidHostIdentity(String),

    #[error("Backup root unreachable: {}", .0.display())]
    BackupRootUnreachable(PathBuf),

    #[error("Backup root corrupted or unreadable: {}", .0.display())]
    BackupRootCorrupted(PathBuf),

    #[error("Users root unreachable: {}", .0.display())]
    UsersRootUnreachable(PathBuf),

    #[error("No users found under {}", .0.display())]
    NoUsersFound(PathBuf),

    #[error("Permission reset failed: {0}")]
    PermissionReset(String),

    #[error("Free space query failed: {0}")]
    SpaceQuery(String),
}

impl BackupError {
    /// Whether retrying the failed operation has a chance of succeeding.
    ///
    /// Only I/O failures qualify, and only those that are not an outright
    /// refusal (permissions, missing source, bad input).
    pub fn is_transient(&self) -> bool {
        match self {
            BackupError::Io(e) => !matches!(
                e.kind(),
                ErrorKind::PermissionDenied
                    | ErrorKind::NotFound
                    | ErrorKind::InvalidInput
                    | ErrorKind::InvalidData
                    | ErrorKind::Unsupported
                    | ErrorKind::AlreadyExists
            ),
            _ => false,
        }
    }

    /// Whether this error aborts the whole run rather than a single step.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BackupError::Config(_)
                | BackupError::InvalidHostIdentity(_)
                | BackupError::BackupRootUnreachable(_)
                | BackupError::BackupRootCorrupted(_)
                | BackupError::UsersRootUnreachable(_)
                | BackupError::NoUsersFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BackupError>;
