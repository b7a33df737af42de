//! Profile Backup Library
//!
//! Backs up and restores Chrome and Edge profile data between workstation
//! user profiles and a per-host folder on a network share.

pub mod config;
pub mod fs;
pub mod host;
pub mod orchestrator;
pub mod platform;
pub mod profile;
pub mod report;
pub mod sync;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use orchestrator::{BackupOrchestrator, Ledger, RestoreOrchestrator, RunContext};
pub use utils::errors::BackupError;
pub type Result<T> = std::result::Result<T, BackupError>;
