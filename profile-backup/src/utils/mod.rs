//! Utility modules for profile backup.

pub mod errors;
pub mod logger;

pub use errors::{BackupError, Result};
