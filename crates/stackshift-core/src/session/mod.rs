//! Batch session discovery and bookkeeping.
//!
//! A batch session lives in `<root>/.stackshift-batch-session.json` and is
//! shared by every working directory below `<root>`. [`BatchSessionRegistry`]
//! finds it by walking upward from a start directory:
//!
//! ```text
//! /work/batch/.stackshift-batch-session.json   <- found here
//! /work/batch/repo-a/.git                      <- marker: stop here if not found
//! /work/batch/repo-a/sub                       <- start
//! ```
//!
//! The walk is a bounded loop. At each level the session file is checked
//! first, then the repository-root marker; a level carrying the marker ends
//! the walk. A session file that cannot be parsed, or whose recorded root
//! does not match its location, is treated as absent at that level.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::security::PathValidator;

mod persistence;
pub mod registry_ops;


/// Name of the batch session file inside a batch root directory.
pub const SESSION_FILE_NAME: &str = ".stackshift-batch-session.json";

/// Upper bound on the number of directory levels examined by a walk.
pub const MAX_WALK_DEPTH: usize = 64;

/// Decides whether a directory is the root of a repository, which bounds
/// upward session discovery.
pub trait RepoRootMarker: Send + Sync {
    fn is_repo_root(&self, dir: &Path) -> bool;
}

/// Treats any directory containing a `.git` entry (directory or file, as in
/// worktrees and submodules) as a repository root.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitRootMarker;

impl RepoRootMarker for GitRootMarker {
    fn is_repo_root(&self, dir: &Path) -> bool {
        dir.join(".git").exists()
    }
}

impl<F> RepoRootMarker for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn is_repo_root(&self, dir: &Path) -> bool {
        self(dir)
    }
}

/// Finds, creates and updates batch sessions for directories inside the
/// validator's authorized set.
#[derive(Clone)]
pub struct BatchSessionRegistry {
    pub(crate) validator: PathValidator,
    pub(crate) marker: Arc<dyn RepoRootMarker>,
}

impl BatchSessionRegistry {
    /// Registry using `.git` as the repository-root marker.
    pub fn new(validator: PathValidator) -> Self {
        Self {
            validator,
            marker: Arc::new(GitRootMarker),
        }
    }

    /// Replace the repository-root marker.
    pub fn with_marker(mut self, marker: impl RepoRootMarker + 'static) -> Self {
        self.marker = Arc::new(marker);
        self
    }

    pub fn validator(&self) -> &PathValidator {
        &self.validator
    }
}

impl fmt::Debug for BatchSessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchSessionRegistry")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}
