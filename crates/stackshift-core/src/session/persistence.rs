//! Blocking session file access and the upward walk.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::{RepoRootMarker, MAX_WALK_DEPTH, SESSION_FILE_NAME};
use crate::error::{ErrorKind, Result};
use crate::file_io::{read_json_safe, write_json_atomic};
use crate::models::BatchSession;

/// Read the session stored directly in `dir`.
///
/// Missing, malformed and schema-invalid files yield `Ok(None)`; only
/// security-relevant failures are returned.
pub(crate) fn read_session(dir: &Path) -> Result<Option<BatchSession>> {
    let path = dir.join(SESSION_FILE_NAME);
    let value = match read_json_safe(&path) {
        Ok(value) => value,
        Err(e) if e.is_security_relevant() => return Err(e),
        Err(e) => {
            if e.kind() != Some(ErrorKind::NotFound) {
                warn!("ignoring unreadable session file {}: {e}", path.display());
            }
            return Ok(None);
        }
    };

    let session: BatchSession = match serde_json::from_value(value) {
        Ok(session) => session,
        Err(e) => {
            warn!("ignoring session file {} with invalid shape: {e}", path.display());
            return Ok(None);
        }
    };

    let errors = session.validate(dir);
    if !errors.is_empty() {
        warn!(
            "ignoring invalid session file {}: {}",
            path.display(),
            errors.join("; ")
        );
        return Ok(None);
    }
    Ok(Some(session))
}

/// Walk upward from `start` looking for a session.
pub(crate) fn find_session(
    start: &Path,
    marker: &dyn RepoRootMarker,
) -> Result<Option<BatchSession>> {
    let mut dir: PathBuf = start.to_path_buf();
    for _ in 0..MAX_WALK_DEPTH {
        if let Some(session) = read_session(&dir)? {
            debug!("found batch session in {}", dir.display());
            return Ok(Some(session));
        }
        if marker.is_repo_root(&dir) {
            debug!("stopped session search at repository root {}", dir.display());
            return Ok(None);
        }
        match dir.parent() {
            Some(parent) => dir = parent.to_path_buf(),
            None => return Ok(None),
        }
    }
    warn!(
        "stopped session search after {MAX_WALK_DEPTH} levels above {}",
        start.display()
    );
    Ok(None)
}

/// Persist `session` into its own root directory.
pub(crate) fn write_session(session: &BatchSession) -> Result<()> {
    let path = session.batch_root_directory.join(SESSION_FILE_NAME);
    write_json_atomic(&path, session)
}
