//! File operations performed after confinement.
//!
//! Each function takes the caller's raw path, resolves it through the
//! [`PathGuard`] and only then touches the filesystem. There is no
//! buffering, locking or retrying: failures are returned immediately.

use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::MAIN_SEPARATOR;
use std::time::SystemTime;
use tracing::{debug, warn};

use super::error::FsError;
use crate::core::security::{ConfinedPath, PathGuard};

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
}

/// Metadata reported by [`stat`].
#[derive(Debug, Clone)]
pub struct FileStat {
    pub size: u64,
    /// Not every platform or filesystem records a creation time.
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
}

/// Read a whole file as raw bytes.
pub fn read_bytes(guard: &PathGuard, path: &str) -> Result<Vec<u8>, FsError> {
    let target = guard.resolve(path)?;
    fs::read(&target).map_err(|e| FsError::io("read", path, e))
}

/// Read a whole file as UTF-8 text.
pub fn read_text(guard: &PathGuard, path: &str) -> Result<String, FsError> {
    let bytes = read_bytes(guard, path)?;
    String::from_utf8(bytes).map_err(|_| FsError::InvalidUtf8 {
        path: path.to_string(),
    })
}

/// Truncate-write `content` to `path`, creating missing parent directories.
///
/// Returns the number of bytes written.
pub fn write_text(guard: &PathGuard, path: &str, content: &str) -> Result<usize, FsError> {
    let target = guard.resolve(path)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| FsError::Io {
            action: "create directories for",
            path: path.to_string(),
            error: e,
        })?;
    }

    fs::write(&target, content).map_err(|e| FsError::io("write", path, e))?;
    debug!("Wrote {} bytes to {}", content.len(), target);
    Ok(content.len())
}

/// Base names of the entries in `directory` matching a glob `pattern`.
///
/// The pattern follows shell rules: `*` does not cross `/` and does not
/// match a leading dot. Matches are returned in glob order (sorted by
/// path). Every match is confined again, so a pattern containing `..`
/// cannot reach outside the allowed roots.
pub fn list_matching(
    guard: &PathGuard,
    directory: &str,
    pattern: &str,
) -> Result<Vec<String>, FsError> {
    let dir = confined_directory(guard, directory)?;

    let dir_str = dir.to_str().ok_or_else(|| FsError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: "directory path is not valid UTF-8".to_string(),
    })?;
    let full_pattern = format!("{}{}{}", Pattern::escape(dir_str), MAIN_SEPARATOR, pattern);

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let paths = glob::glob_with(&full_pattern, options).map_err(|e| FsError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.msg.to_string(),
    })?;

    let mut names = Vec::new();
    for entry in paths {
        let matched = match entry {
            Ok(p) => p,
            Err(e) => {
                warn!("Skipping unreadable match: {}", e);
                continue;
            }
        };

        let Some(matched_str) = matched.to_str() else {
            warn!("Skipping non UTF-8 match: {}", matched.display());
            continue;
        };
        if guard.resolve(matched_str).is_err() {
            continue;
        }

        if let Some(name) = matched.file_name() {
            names.push(name.to_string_lossy().to_string());
        }
    }

    Ok(names)
}

/// Size and timestamps of a file or directory.
pub fn stat(guard: &PathGuard, path: &str) -> Result<FileStat, FsError> {
    let target = guard.resolve(path)?;
    let metadata = fs::metadata(&target).map_err(|e| FsError::io("stat", path, e))?;

    Ok(FileStat {
        size: metadata.len(),
        created: metadata.created().ok(),
        modified: metadata.modified().ok(),
    })
}

/// All entries of `directory`, sorted by name.
///
/// Symlinks are followed and reported as their target's kind and size.
/// Entries that resolve outside the allowed roots, or whose metadata cannot
/// be read, are skipped.
pub fn list_entries(guard: &PathGuard, directory: &str) -> Result<Vec<FileEntry>, FsError> {
    let dir = confined_directory(guard, directory)?;
    let read_dir = fs::read_dir(&dir).map_err(|e| FsError::io("list", directory, e))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Error reading entry in {}: {}", dir, e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().to_string();
        let entry_path = entry.path();
        let Some(entry_str) = entry_path.to_str() else {
            warn!("Skipping non UTF-8 entry: {}", entry_path.display());
            continue;
        };
        let target = match guard.resolve(entry_str) {
            Ok(t) => t,
            Err(e) => {
                debug!("Skipping entry {}: {}", name, e);
                continue;
            }
        };
        let metadata = match fs::metadata(&target) {
            Ok(m) => m,
            Err(e) => {
                warn!("Failed to get metadata for {}: {}", name, e);
                continue;
            }
        };

        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        entries.push(FileEntry {
            name,
            kind,
            size: metadata.len(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn confined_directory(guard: &PathGuard, directory: &str) -> Result<ConfinedPath, FsError> {
    let dir = guard.resolve(directory)?;
    let metadata = fs::metadata(&dir).map_err(|e| FsError::io("list", directory, e))?;
    if !metadata.is_dir() {
        return Err(FsError::NotADirectory {
            path: directory.to_string(),
        });
    }
    Ok(dir)
}
