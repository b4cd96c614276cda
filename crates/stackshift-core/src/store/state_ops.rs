//! Whole-document operations for the StateStore.

use log::info;

use super::{persistence, StateStore};
use crate::{
    blocking::run_blocking,
    error::{Result, ValidationError},
    file_io::remove_if_exists,
    models::{Route, WorkflowState},
};

impl StateStore {
    /// Load the current state.
    ///
    /// A missing file, or one that parses but fails the schema, yields a
    /// fresh default state for this directory. Malformed JSON and
    /// security-relevant failures are returned as errors.
    pub async fn load(&self) -> Result<WorkflowState> {
        let path = self.state_path.clone();
        let dir = self.directory.clone();
        run_blocking(move || persistence::load_or_default(&path, &dir)).await
    }

    /// True if a valid state file is present.
    pub async fn is_initialized(&self) -> Result<bool> {
        let path = self.state_path.clone();
        run_blocking(move || Ok(persistence::read_state(&path)?.is_some())).await
    }

    /// Write a fresh state positioned at the first step, unless a valid one
    /// already exists, in which case it is returned unchanged.
    pub async fn initialize(&self, route: Option<Route>) -> Result<WorkflowState> {
        let path = self.state_path.clone();
        let dir = self.directory.clone();
        run_blocking(move || persistence::initialize_state(&path, &dir, route)).await
    }

    /// Apply `mutator` to the current state and persist the result.
    ///
    /// The result is validated before writing; on violation nothing is
    /// written and an `invalidInput` error lists every problem. The
    /// `updated` timestamp is set by the store.
    pub async fn update<F>(&self, mutator: F) -> Result<WorkflowState>
    where
        F: FnOnce(WorkflowState) -> WorkflowState + Send + 'static,
    {
        self.try_update(move |state| Ok(mutator(state))).await
    }

    /// Like [`StateStore::update`], for mutators that can refuse.
    pub async fn try_update<F>(&self, mutator: F) -> Result<WorkflowState>
    where
        F: FnOnce(WorkflowState) -> std::result::Result<WorkflowState, ValidationError>
            + Send
            + 'static,
    {
        let path = self.state_path.clone();
        let dir = self.directory.clone();
        run_blocking(move || persistence::update_state(&path, &dir, mutator)).await
    }

    /// Delete the state file. Returns whether one existed.
    pub async fn reset(&self) -> Result<bool> {
        let path = self.state_path.clone();
        let removed = run_blocking(move || remove_if_exists(&path)).await?;
        if removed {
            info!("reset workflow state in {}", self.directory.display());
        }
        Ok(removed)
    }
}
