//! Persistent workflow state for a single working directory.
//!
//! [`StateStore`] owns `<dir>/.stackshift-state.json`. Every mutation is a
//! read-modify-write of the whole document:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │   Persistence   │
//! │ (step_handlers) │───▶│  (state_ops)    │───▶│ (file_io, via   │
//! │                 │    │                 │    │  persistence)   │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!   Workflow verbs         load / update        bounded read,
//!                                               atomic write
//! ```
//!
//! - [`builder`]: validates the target directory and composes the file path
//! - [`state_ops`]: `load`, `initialize`, `update`, `reset`
//! - [`step_handlers`]: step and configuration verbs built on `update`
//!
//! The file is replaced atomically, so a concurrent reader sees either the
//! previous or the next document. Concurrent writers are last-writer-wins;
//! there is no cross-process lock.
//!
//! # Examples
//!
//! ```rust,no_run
//! use stackshift_core::models::{Route, WorkflowStep};
//! use stackshift_core::StateStoreBuilder;
//!
//! # async fn example() -> stackshift_core::Result<()> {
//! let store = StateStoreBuilder::new("/home/user/project").build()?;
//! store.initialize(Some(Route::Brownfield)).await?;
//!
//! let state = store.complete_step(WorkflowStep::Analyze, None).await?;
//! assert_eq!(state.current_step, Some(WorkflowStep::ReverseEngineer));
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

pub mod builder;
mod persistence;
pub mod state_ops;
pub mod step_handlers;


pub use builder::StateStoreBuilder;

/// Name of the workflow state file inside a working directory.
pub const STATE_FILE_NAME: &str = ".stackshift-state.json";

/// Handle to the workflow state of one validated directory.
#[derive(Debug, Clone)]
pub struct StateStore {
    pub(crate) directory: PathBuf,
    pub(crate) state_path: PathBuf,
}

impl StateStore {
    pub(crate) fn new(directory: PathBuf, state_path: PathBuf) -> Self {
        Self {
            directory,
            state_path,
        }
    }

    /// The validated directory this store manages.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Full path of the state file.
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }
}
