//! The path confinement gate.
//!
//! Every filesystem operation in the server receives its target as a
//! [`ConfinedPath`], and the only way to obtain one is [`PathGuard::resolve`].

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::roots::{RootSet, expand_home, normalize_lexically};
use crate::core::config::SecurityConfig;

/// Errors that can occur during path confinement.
#[derive(Debug, thiserror::Error)]
pub enum PathGuardError {
    #[error("Path '{path}' is outside of allowed directories: {roots}")]
    OutsideAllowedRoots { path: String, roots: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("Cannot expand '~' in '{path}': home directory is unknown")]
    HomeDirUnavailable { path: String },

    #[error("Symlink '{path}' cannot be resolved")]
    UnresolvableSymlink { path: PathBuf },

    #[error("Cannot resolve path '{path}': {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
}

/// An absolute, symlink-resolved path inside one of the allowed roots.
///
/// Produced per request by [`PathGuard::resolve`] and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfinedPath(PathBuf);

impl ConfinedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl Deref for ConfinedPath {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for ConfinedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ConfinedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

/// Validates caller-supplied paths against the allowed roots.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct PathGuard {
    roots: RootSet,
    home: Option<PathBuf>,
    base_dir: PathBuf,
}

impl PathGuard {
    /// Create a guard over an explicit root set.
    ///
    /// `home` is used to expand `~`; relative requests are joined to
    /// `base_dir`, which must be absolute.
    pub fn new(roots: RootSet, home: Option<PathBuf>, base_dir: PathBuf) -> Self {
        Self {
            roots,
            home,
            base_dir,
        }
    }

    /// Build the guard for this process from the security configuration,
    /// the user's home directory and the current working directory.
    pub fn from_config(config: &SecurityConfig) -> Result<Self, PathGuardError> {
        let home = dirs::home_dir();
        let base_dir = std::env::current_dir().map_err(|error| PathGuardError::Io {
            path: PathBuf::from("."),
            error,
        })?;

        let roots = RootSet::new(&config.allowed_roots, home.as_deref(), &base_dir);
        if roots.is_empty() {
            warn!("No usable allowed roots configured - every path will be rejected");
        }

        Ok(Self::new(roots, home, base_dir))
    }

    /// The canonical allowed roots.
    pub fn roots(&self) -> &RootSet {
        &self.roots
    }

    /// Resolve `requested` to a path inside the allowed roots.
    ///
    /// Steps: expand `~`, make absolute against the base directory,
    /// collapse `.`/`..`, resolve symlinks along the longest existing
    /// ancestor, then require the result to equal or descend from a root.
    /// Components that do not exist yet are kept as written, which lets
    /// write operations target new files.
    pub fn resolve(&self, requested: &str) -> Result<ConfinedPath, PathGuardError> {
        if requested.contains('\0') {
            return Err(PathGuardError::InvalidPath {
                path: requested.replace('\0', "\\0"),
                reason: "contains a NUL byte",
            });
        }

        let expanded = expand_home(Path::new(requested), self.home.as_deref()).ok_or_else(
            || PathGuardError::HomeDirUnavailable {
                path: requested.to_string(),
            },
        )?;
        let absolute = normalize_lexically(&self.base_dir.join(expanded));
        let canonical = match resolve_existing_prefix(&absolute) {
            Ok(canonical) => canonical,
            // Failures outside the roots are reported like any other
            // outside path.
            Err(unresolved) => {
                if self.roots.containing(&unresolved.location).is_none() {
                    return Err(self.reject(requested, &unresolved.location));
                }
                warn!("Rejected '{}': {}", requested, unresolved.error);
                return Err(unresolved.error);
            }
        };

        match self.roots.containing(&canonical) {
            Some(root) => {
                debug!("'{}' confined under {}", requested, root.display());
                Ok(ConfinedPath(canonical))
            }
            None => Err(self.reject(requested, &canonical)),
        }
    }

    fn reject(&self, requested: &str, resolved: &Path) -> PathGuardError {
        warn!("Rejected '{}' (resolved to {})", requested, resolved.display());
        PathGuardError::OutsideAllowedRoots {
            path: requested.to_string(),
            roots: self.roots.display_list(),
        }
    }
}

/// A path whose existing prefix could not be canonicalized.
#[derive(Debug)]
pub(crate) struct Unresolved {
    /// Best known location: the failing entry's resolved parent joined with
    /// the rest of the path.
    pub(crate) location: PathBuf,
    pub(crate) error: PathGuardError,
}

/// Canonicalize the longest existing ancestor of `path` and re-append the
/// components below it that do not exist.
///
/// `path` must be absolute and lexically normalized, so the re-appended
/// tail never contains `.` or `..`. An existing entry that cannot be
/// canonicalized is a dangling or looping symlink and is rejected.
pub(crate) fn resolve_existing_prefix(path: &Path) -> Result<PathBuf, Unresolved> {
    let mut missing: Vec<&OsStr> = Vec::new();
    let mut current = path;

    loop {
        let error = match fs::symlink_metadata(current) {
            Ok(metadata) => match current.canonicalize() {
                Ok(mut resolved) => {
                    resolved.extend(missing.iter().rev().copied());
                    return Ok(resolved);
                }
                Err(_) if metadata.file_type().is_symlink() => {
                    PathGuardError::UnresolvableSymlink {
                        path: current.to_path_buf(),
                    }
                }
                Err(error) => PathGuardError::Io {
                    path: current.to_path_buf(),
                    error,
                },
            },
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                match (current.parent(), current.file_name()) {
                    (Some(parent), Some(name)) => {
                        missing.push(name);
                        current = parent;
                        continue;
                    }
                    _ => PathGuardError::Io {
                        path: current.to_path_buf(),
                        error,
                    },
                }
            }
            Err(error) => PathGuardError::Io {
                path: current.to_path_buf(),
                error,
            },
        };

        let mut location = match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                let mut parent = resolve_existing_prefix(parent).unwrap_or_else(|u| u.location);
                parent.push(name);
                parent
            }
            _ => current.to_path_buf(),
        };
        location.extend(missing.iter().rev().copied());
        return Err(Unresolved { location, error });
    }
}
