//! Blocking read-modify-write primitives behind [`super::StateStore`].

use std::path::Path;

use jiff::Timestamp;
use log::{debug, warn};

use crate::error::{ErrorKind, Result, ValidationError};
use crate::file_io::{read_json_safe, write_json_atomic};
use crate::models::{WorkflowState, WorkflowStep};

/// Read the state file.
///
/// Returns `Ok(None)` when the file is missing or does not satisfy the
/// schema. Security-relevant failures and malformed JSON are returned as
/// errors.
pub(crate) fn read_state(path: &Path) -> Result<Option<WorkflowState>> {
    let value = match read_json_safe(path) {
        Ok(value) => value,
        Err(e) if e.kind() == Some(ErrorKind::NotFound) => {
            debug!("no state file at {}", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let state: WorkflowState = match serde_json::from_value(value) {
        Ok(state) => state,
        Err(e) => {
            warn!(
                "state file {} does not match the schema, using defaults: {e}",
                path.display()
            );
            return Ok(None);
        }
    };

    let errors = state.validate();
    if !errors.is_empty() {
        warn!(
            "state file {} violates invariants, using defaults: {}",
            path.display(),
            errors.join("; ")
        );
        return Ok(None);
    }
    Ok(Some(state))
}

/// Read the state file, falling back to a fresh state for `dir`.
pub(crate) fn load_or_default(path: &Path, dir: &Path) -> Result<WorkflowState> {
    Ok(read_state(path)?.unwrap_or_else(|| WorkflowState::new(dir)))
}

/// Create the state file if it is absent or unusable; otherwise return the
/// existing state untouched.
pub(crate) fn initialize_state(
    path: &Path,
    dir: &Path,
    route: Option<crate::models::Route>,
) -> Result<WorkflowState> {
    if let Some(existing) = read_state(path)? {
        debug!("state already initialized at {}", path.display());
        return Ok(existing);
    }

    let mut state = WorkflowState::new(dir);
    state.current_step = Some(WorkflowStep::Analyze);
    if let Some(route) = route {
        state.set_route(route);
    }
    write_json_atomic(path, &state)?;
    Ok(state)
}

/// Re-read, mutate, validate, stamp and atomically write the state.
///
/// Nothing is written when the mutator fails or leaves the state invalid.
pub(crate) fn update_state<F>(path: &Path, dir: &Path, mutator: F) -> Result<WorkflowState>
where
    F: FnOnce(WorkflowState) -> std::result::Result<WorkflowState, ValidationError>,
{
    let current = load_or_default(path, dir)?;
    let mut next = mutator(current)?;

    let errors = next.validate();
    if !errors.is_empty() {
        return Err(ValidationError::invalid_input(
            "Update would leave the workflow state invalid",
        )
        .with_details(errors.join("; "))
        .into());
    }

    next.updated = Timestamp::now();
    write_json_atomic(path, &next)?;
    Ok(next)
}
