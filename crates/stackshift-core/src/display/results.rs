//! Result wrapper types for displaying operation outcomes.
//!
//! Each wrapper prints a one-line confirmation followed by the resource.

use std::fmt;

use crate::models::{BatchSession, WorkflowState};

/// Wrapper type for displaying the result of create operations.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
///
/// use stackshift_core::{display::CreateResult, models::BatchSession};
///
/// let session = BatchSession::new("/work/batch".into(), 12, 5, BTreeMap::new()).unwrap();
/// let output = CreateResult::new(session).to_string();
/// assert!(output.starts_with("Started batch session"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<WorkflowState> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Initialized workflow for {}",
            self.resource.metadata.project_name
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<BatchSession> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Started batch session {}", self.resource.session_id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, with an
/// optional list of the changes made.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    /// Create a new UpdateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }

    fn fmt_changes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for UpdateResult<WorkflowState> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Updated workflow for {}",
            self.resource.metadata.project_name
        )?;
        self.fmt_changes(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<BatchSession> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated batch session {}", self.resource.session_id)?;
        self.fmt_changes(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult {
    /// What was deleted, e.g. "workflow state"
    pub resource: &'static str,
    pub removed: bool,
}

impl DeleteResult {
    /// Create a new DeleteResult wrapper.
    pub fn new(resource: &'static str, removed: bool) -> Self {
        Self { resource, removed }
    }
}

impl fmt::Display for DeleteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.removed {
            writeln!(f, "Deleted {}", self.resource)
        } else {
            writeln!(f, "No {} to delete", self.resource)
        }
    }
}
