//! Human-readable rendering of file operation results.

use chrono::{DateTime, Local};
use std::time::SystemTime;

use super::operations::{EntryKind, FileEntry, FileStat};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Format a byte count as bytes, KB or MB with `decimals` fraction digits.
pub fn human_size(bytes: u64, decimals: usize) -> String {
    if bytes < KIB {
        format!("{} bytes", bytes)
    } else if bytes < MIB {
        format!("{:.*} KB", decimals, bytes as f64 / KIB as f64)
    } else {
        format!("{:.*} MB", decimals, bytes as f64 / MIB as f64)
    }
}

/// Local time as `YYYY-MM-DD HH:MM:SS`, or `unknown` when the platform
/// did not report the timestamp.
pub fn timestamp(time: Option<SystemTime>) -> String {
    match time {
        Some(time) => DateTime::<Local>::from(time)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "unknown".to_string(),
    }
}

pub fn file_info(path: &str, stat: &FileStat) -> String {
    format!(
        "File: {}\nSize: {}\nCreated: {}\nModified: {}",
        path,
        human_size(stat.size, 2),
        timestamp(stat.created),
        timestamp(stat.modified)
    )
}

/// Result text for `list_files`. An empty match list is a normal result.
pub fn matches(directory: &str, pattern: &str, names: &[String]) -> String {
    if names.is_empty() {
        format!("No files matching '{}' found in {}", pattern, directory)
    } else {
        format!(
            "Files in {} matching '{}':\n{}",
            directory,
            pattern,
            names.join("\n")
        )
    }
}

/// Directory listing with a folder/file marker per entry.
pub fn directory_listing(directory: &str, entries: &[FileEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(format!("Directory: {}", directory));

    for entry in entries {
        match entry.kind {
            EntryKind::Directory => lines.push(format!("📁 {}/", entry.name)),
            EntryKind::File => lines.push(format!(
                "📄 {} ({})",
                entry.name,
                human_size(entry.size, 1)
            )),
        }
    }

    lines.join("\n")
}
