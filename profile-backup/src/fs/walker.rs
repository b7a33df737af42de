//! Directory traversal for copying and sizing profile trees.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Options for directory walking
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Follow symbolic links
    pub follow_links: bool,

    /// Report directories as well as files
    pub include_dirs: bool,
}

/// Information about an entry discovered during walking
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Full path to the entry
    pub path: PathBuf,

    /// Relative path from the root
    pub relative_path: PathBuf,

    /// File size in bytes (0 for directories)
    pub size: u64,

    /// Is this a directory?
    pub is_dir: bool,
}

impl FileInfo {
    /// Create FileInfo from a DirEntry.
    /// Symlinks are resolved to their target; broken links yield None.
    fn from_entry(entry: &DirEntry, root: &Path) -> std::io::Result<Option<Self>> {
        let path = entry.path().to_path_buf();
        let relative_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();

        let metadata = if entry.path_is_symlink() {
            match std::fs::metadata(&path) {
                Ok(resolved) => resolved,
                Err(_) => return Ok(None),
            }
        } else {
            entry.metadata()?
        };

        let is_dir = metadata.is_dir();
        Ok(Some(Self {
            path,
            relative_path,
            size: if is_dir { 0 } else { metadata.len() },
            is_dir,
        }))
    }
}

/// Walk a directory tree with a callback for each entry below `root`.
///
/// The root itself is never reported. The first unreadable entry aborts the
/// walk with its error.
pub fn walk_directory_with_callback<F>(
    root: &Path,
    options: &WalkOptions,
    mut callback: F,
) -> std::io::Result<()>
where
    F: FnMut(&FileInfo) -> std::io::Result<()>,
{
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(options.follow_links);

    for entry in walker {
        let entry = entry?;

        if entry.file_type().is_dir() && !options.include_dirs {
            continue;
        }

        if let Some(file_info) = FileInfo::from_entry(&entry, root)? {
            if file_info.is_dir && !options.include_dirs {
                continue;
            }
            callback(&file_info)?;
        }
    }

    Ok(())
}

/// Total size of all files under `path`.
///
/// A plain file counts as itself; a missing path counts as zero.
pub fn calculate_total_size(path: &Path) -> std::io::Result<u64> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };
    if !metadata.is_dir() {
        return Ok(metadata.len());
    }

    let mut total_size = 0u64;
    walk_directory_with_callback(path, &WalkOptions::default(), |file| {
        total_size += file.size;
        Ok(())
    })?;

    Ok(total_size)
}
