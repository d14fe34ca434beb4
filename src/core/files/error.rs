//! Errors produced by the confined file operations.

use std::io;
use thiserror::Error;

use crate::core::security::PathGuardError;

/// Errors that can occur while operating on a confined path.
///
/// Paths in messages are the caller's request as written, not the resolved
/// location.
#[derive(Debug, Error)]
pub enum FsError {
    /// The path was rejected by the guard; no filesystem call was made.
    #[error(transparent)]
    Guard(#[from] PathGuardError),

    #[error("'{path}' not found")]
    NotFound { path: String },

    #[error("'{path}' is not a directory")]
    NotADirectory { path: String },

    #[error("'{path}' is not valid UTF-8 text")]
    InvalidUtf8 { path: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to {action} '{path}': {error}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        error: io::Error,
    },
}

impl FsError {
    /// Classify an I/O failure for `path`.
    pub fn io(action: &'static str, path: impl Into<String>, error: io::Error) -> Self {
        let path = path.into();
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::NotADirectory => Self::NotADirectory { path },
            _ => Self::Io {
                action,
                path,
                error,
            },
        }
    }

    /// Whether the request was refused by the path guard.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Guard(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_classification() {
        let not_found = io::Error::from(io::ErrorKind::NotFound);
        assert!(matches!(
            FsError::io("read", "a.txt", not_found),
            FsError::NotFound { .. }
        ));

        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        let err = FsError::io("write", "a.txt", denied);
        assert!(matches!(err, FsError::Io { action: "write", .. }));
        assert!(err.to_string().starts_with("Failed to write 'a.txt'"));
    }

    #[test]
    fn test_guard_error_is_transparent() {
        let err = FsError::from(PathGuardError::OutsideAllowedRoots {
            path: "/etc/passwd".to_string(),
            roots: "[/data]".to_string(),
        });
        assert!(err.is_rejection());
        assert_eq!(
            err.to_string(),
            "Path '/etc/passwd' is outside of allowed directories: [/data]"
        );
    }
}
