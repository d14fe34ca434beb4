//! The set of directories the server is allowed to touch.

use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use super::path_guard::resolve_existing_prefix;

/// Ordered, immutable list of allowed root directories.
///
/// Every entry is absolute and free of `.`/`..` segments. Entries that
/// exist on disk at construction time are also symlink-resolved, so they
/// compare correctly against canonicalized request paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootSet {
    roots: Vec<PathBuf>,
}

impl RootSet {
    /// Build a root set from raw configured entries.
    ///
    /// `~` is expanded against `home`, relative entries are joined to
    /// `base_dir`. Empty and duplicate entries are dropped.
    pub fn new<I, P>(entries: I, home: Option<&Path>, base_dir: &Path) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut roots: Vec<PathBuf> = Vec::new();

        for entry in entries {
            let entry = entry.as_ref();
            if entry.as_os_str().is_empty() {
                continue;
            }

            let Some(expanded) = expand_home(entry, home) else {
                warn!(
                    "Skipping root {:?}: home directory is unknown",
                    entry.display()
                );
                continue;
            };

            let normalized = normalize_lexically(&base_dir.join(expanded));
            let root = match normalized.canonicalize() {
                Ok(canonical) => canonical,
                Err(e) => {
                    // Canonical existing ancestor plus the missing tail.
                    let root = match resolve_existing_prefix(&normalized) {
                        Ok(resolved) => resolved,
                        Err(unresolved) => unresolved.location,
                    };
                    warn!(
                        "Root {} cannot be resolved ({}); using {}",
                        normalized.display(),
                        e,
                        root.display()
                    );
                    root
                }
            };

            if !roots.contains(&root) {
                debug!("Allowed root: {}", root.display());
                roots.push(root);
            }
        }

        Self { roots }
    }

    /// Iterate over the roots in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// The first root equal to or containing `path`.
    ///
    /// `path` must already be canonical. The comparison is made per path
    /// component, so `/data-evil` is not inside `/data`.
    pub fn containing(&self, path: &Path) -> Option<&Path> {
        self.iter().find(|root| path.starts_with(root))
    }

    /// Display form used in diagnostics.
    pub fn display_list(&self) -> String {
        let shown: Vec<String> = self.iter().map(|r| r.display().to_string()).collect();
        format!("[{}]", shown.join(", "))
    }
}

/// Expand a leading `~` component. Returns `None` when the path needs a
/// home directory and none is known.
///
/// Only a bare `~` component is expanded; `~user/...` is left untouched.
pub(crate) fn expand_home(path: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = home?;
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                Some(home.to_path_buf())
            } else {
                Some(home.join(rest))
            }
        }
        _ => Some(path.to_path_buf()),
    }
}

/// Collapse `.` and `..` without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
