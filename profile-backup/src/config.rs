//! Configuration management for profile backup.
//!
//! Loads configuration from TOML file with environment variable overrides.

use crate::utils::errors::{BackupError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub restore: RestoreConfig,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Local root holding one directory per user account
    pub users_root: PathBuf,

    /// Network share; each host writes under `<share_root>/<hostname>`
    pub share_root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Total attempts per file operation, first try included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed wait between attempts
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,

    /// What to record when a browser profile directory does not exist
    #[serde(default)]
    pub missing_profile: MissingProfilePolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingProfilePolicy {
    #[default]
    Fail,
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Account directories never treated as users (case-insensitive)
    #[serde(default = "default_excluded_users")]
    pub excluded_users: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreConfig {
    /// Command run on each restored profile; `{path}` is substituted.
    /// An empty list disables the step.
    #[serde(default = "default_permission_reset_command")]
    pub permission_reset_command: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Require hostnames of the form `<site digits>-<name>`
    #[serde(default = "default_require_site_prefix")]
    pub require_site_prefix: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output (stdout, file)
    #[serde(default = "default_log_output")]
    pub output: String,

    /// Log file used when `output = "file"`
    #[serde(default)]
    pub file: Option<PathBuf>,
}

// Default values
fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_secs() -> u64 {
    5
}

fn default_excluded_users() -> Vec<String> {
    ["administrator", "public", "default", "default user", "all users"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_permission_reset_command() -> Vec<String> {
    ["icacls", "{path}", "/reset", "/T", "/C", "/Q"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_require_site_prefix() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stdout".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff_secs(),
            missing_profile: MissingProfilePolicy::default(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            excluded_users: default_excluded_users(),
        }
    }
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            permission_reset_command: default_permission_reset_command(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            require_site_prefix: default_require_site_prefix(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: default_log_output(),
            file: None,
        }
    }
}

impl SyncConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }
}

impl LogConfig {
    /// File to log into, if file output is selected
    pub fn file_target(&self) -> Option<&Path> {
        if self.output == "file" {
            self.file.as_deref()
        } else {
            None
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| BackupError::Config(e.to_string()))
    }

    /// Overlay `PROFILE_BACKUP_USERS_ROOT`, `PROFILE_BACKUP_SHARE_ROOT` and `LOG_LEVEL`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("PROFILE_BACKUP_USERS_ROOT") {
            self.paths.users_root = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("PROFILE_BACKUP_SHARE_ROOT") {
            self.paths.share_root = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            self.log.level = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sync.max_attempts == 0 {
            return Err(BackupError::Config(
                "sync.max_attempts must be at least 1".into(),
            ));
        }
        if self.paths.share_root.as_os_str().is_empty() {
            return Err(BackupError::Config("paths.share_root is empty".into()));
        }
        if self.log.output == "file" && self.log.file.is_none() {
            return Err(BackupError::Config(
                "log.output is \"file\" but log.file is not set".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            paths: PathsConfig {
                users_root: PathBuf::from(r"C:\Users"),
                share_root: PathBuf::from(r"\\backup-share\BrowserProfiles"),
            },
            sync: SyncConfig::default(),
            discovery: DiscoveryConfig::default(),
            restore: RestoreConfig::default(),
            host: HostConfig::default(),
            log: LogConfig::default(),
        }
    }
}
