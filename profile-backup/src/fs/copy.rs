//! Forced recursive copy of a single profile entry.

use crate::fs::walker::{walk_directory_with_callback, WalkOptions};
use std::fs;
use std::io;
use std::path::Path;

/// Copy `src` to `dest`, overwriting whatever is there.
///
/// Files are copied directly. Directories are mirrored entry by entry;
/// existing destination files are overwritten and extra destination files
/// are left alone. Symlinks inside a folder are followed and their targets
/// copied as regular content. Returns the number of bytes written.
pub fn copy_entry(src: &Path, dest: &Path) -> io::Result<u64> {
    let metadata = fs::metadata(src)?;

    if !metadata.is_dir() {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        if dest.is_dir() {
            fs::remove_dir_all(dest)?;
        }
        return fs::copy(src, dest);
    }

    if dest.exists() && !dest.is_dir() {
        fs::remove_file(dest)?;
    }
    fs::create_dir_all(dest)?;

    let options = WalkOptions {
        follow_links: true,
        include_dirs: true,
    };

    let mut bytes = 0u64;
    walk_directory_with_callback(src, &options, |entry| {
        let target = dest.join(&entry.relative_path);
        if entry.is_dir {
            fs::create_dir_all(&target)?;
        } else {
            if target.is_dir() {
                fs::remove_dir_all(&target)?;
            }
            bytes += fs::copy(&entry.path, &target)?;
        }
        Ok(())
    })?;

    Ok(bytes)
}
