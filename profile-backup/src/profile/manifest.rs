//! The fixed set of profile artifacts carried between a browser profile and
//! its backup folder.
//!
//! Chrome and Edge share the same layout, and the list is identical in both
//! directions.

/// Single files copied from the profile root, in copy order.
pub const MANIFEST_FILES: &[&str] = &[
    "Bookmarks",
    "Preferences",
    "Login Data",
    "History",
    "Cookies",
    "Web Data",
];

/// Folders copied recursively from the profile root, in copy order.
pub const MANIFEST_FOLDERS: &[&str] = &[
    "Extensions",
    "Local Storage",
    "Session Storage",
    "Sync Data",
];

/// Ordered file and folder names to copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub files: Vec<String>,
    pub folders: Vec<String>,
}

impl Manifest {
    pub fn new<F, D>(files: F, folders: D) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            folders: folders.into_iter().map(Into::into).collect(),
        }
    }

    /// The browser profile manifest.
    pub fn browser_profile() -> Self {
        Self::new(MANIFEST_FILES.iter().copied(), MANIFEST_FOLDERS.iter().copied())
    }

    /// Every entry name, files first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .chain(self.folders.iter())
            .map(String::as_str)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::browser_profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_profile_order() {
        let manifest = Manifest::browser_profile();
        let entries: Vec<_> = manifest.entries().collect();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0], "Bookmarks");
        assert_eq!(entries[5], "Web Data");
        assert_eq!(entries[6], "Extensions");
        assert_eq!(entries[9], "Sync Data");
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::new(Vec::<String>::new(), Vec::<String>::new());
        assert_eq!(manifest.entries().count(), 0);
    }
}
