//! Confined file operations shared by the tools and resources domains.
//!
//! - `operations` - read, write, list and stat behind the `PathGuard`
//! - `format` - human-readable rendering of their results
//! - `error` - the typed error returned by every operation

mod error;
pub mod format;
pub mod operations;

pub use error::FsError;
pub use operations::{EntryKind, FileEntry, FileStat};
