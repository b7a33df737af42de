//! File system operations for profile backup and restore.

pub mod copy;
pub mod health;
pub mod provision;
pub mod walker;

pub use health::{PathHealth, PathHealthChecker};
pub use provision::{DirectoryProvisioner, Provisioned};
