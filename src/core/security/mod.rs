// Security module for path confinement
//
// All filesystem access in the server goes through `PathGuard`, which
// restricts paths to a fixed set of allowed root directories.

pub mod path_guard;
pub mod roots;

pub use path_guard::{ConfinedPath, PathGuard, PathGuardError};
pub use roots::RootSet;
