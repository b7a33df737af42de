//! Host identity used to key backups on the share.

use crate::utils::errors::{BackupError, Result};
use std::path::{Path, PathBuf};

/// The workstation a run belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    /// Full hostname, used verbatim as the per-host folder on the share
    pub hostname: String,

    /// Leading site number, when the naming convention is enforced
    pub site: Option<String>,
}

impl HostIdentity {
    /// Resolve from an explicit name, falling back to the system hostname.
    pub fn resolve(override_name: Option<&str>, require_site_prefix: bool) -> Result<Self> {
        let hostname = match override_name {
            Some(name) => name.to_string(),
            None => hostname::get()?
                .into_string()
                .map_err(|_| BackupError::InvalidHostIdentity("hostname is not valid UTF-8".into()))?,
        };
        Self::parse(&hostname, require_site_prefix)
    }

    /// Validate a hostname against the `<site digits>-<name>` convention.
    pub fn parse(hostname: &str, require_site_prefix: bool) -> Result<Self> {
        let hostname = hostname.trim();
        if hostname.is_empty() {
            return Err(BackupError::InvalidHostIdentity("empty hostname".into()));
        }
        if hostname.contains(['/', '\\']) {
            return Err(BackupError::InvalidHostIdentity(format!(
                "{hostname} contains a path separator"
            )));
        }

        if !require_site_prefix {
            return Ok(Self {
                hostname: hostname.to_string(),
                site: None,
            });
        }

        match hostname.split_once('-') {
            Some((site, rest))
                if !site.is_empty()
                    && site.chars().all(|c| c.is_ascii_digit())
                    && !rest.is_empty() =>
            {
                Ok(Self {
                    hostname: hostname.to_string(),
                    site: Some(site.to_string()),
                })
            }
            _ => Err(BackupError::InvalidHostIdentity(format!(
                "{hostname} does not match <site>-<name>"
            ))),
        }
    }

    /// `<share_root>/<hostname>`
    pub fn backup_root(&self, share_root: &Path) -> PathBuf {
        share_root.join(&self.hostname)
    }
}
