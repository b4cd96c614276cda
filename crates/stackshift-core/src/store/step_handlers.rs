//! Workflow verbs for the StateStore, each a single read-modify-write.

use serde_json::Value;

use super::StateStore;
use crate::{
    error::Result,
    models::{BatchSession, Progress, Route, WorkflowConfig, WorkflowState, WorkflowStep},
};

impl StateStore {
    /// Record `step` as completed.
    ///
    /// Completing a step twice is a no-op apart from refreshing its details.
    /// When `step` was the current step the current step advances to the next
    /// uncompleted one.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use stackshift_core::{models::WorkflowStep, StateStoreBuilder};
    /// # async {
    /// let store = StateStoreBuilder::new("/home/user/project").build()?;
    /// let details = serde_json::json!({ "language": "TypeScript" });
    /// let state = store.complete_step(WorkflowStep::Analyze, Some(details)).await?;
    /// assert!(state.is_completed(WorkflowStep::Analyze));
    /// # Result::<(), stackshift_core::StoreError>::Ok(())
    /// # };
    /// ```
    pub async fn complete_step(
        &self,
        step: WorkflowStep,
        details: Option<Value>,
    ) -> Result<WorkflowState> {
        self.update(move |mut state| {
            state.complete_step(step, details);
            state
        })
        .await
    }

    /// Mark `step` as in progress. Fails with `invalidInput` if it is already
    /// completed.
    pub async fn start_step(&self, step: WorkflowStep) -> Result<WorkflowState> {
        self.try_update(move |mut state| {
            state.start_step(step)?;
            Ok(state)
        })
        .await
    }

    /// Next step to work on, without modifying anything.
    pub async fn next_step(&self) -> Result<Option<WorkflowStep>> {
        Ok(self.load().await?.next_step())
    }

    /// Completed versus total steps.
    pub async fn progress(&self) -> Result<Progress> {
        Ok(self.load().await?.progress())
    }

    /// Choose the route for this workflow.
    pub async fn set_route(&self, route: Route) -> Result<WorkflowState> {
        self.update(move |mut state| {
            state.set_route(route);
            state
        })
        .await
    }

    /// Overlay the set fields of `patch` onto the stored config.
    ///
    /// A route in the patch is applied through [`WorkflowState::set_route`]
    /// so both copies stay in sync.
    pub async fn update_config(&self, patch: WorkflowConfig) -> Result<WorkflowState> {
        self.update(move |mut state| {
            let route = patch.route;
            state.config.merge(patch);
            if let Some(route) = route {
                state.set_route(route);
            }
            state
        })
        .await
    }

    /// Seed config fields that are still unset from a batch session's answers.
    ///
    /// Values already present in the state win over the session.
    pub async fn adopt_session_answers(&self, session: &BatchSession) -> Result<WorkflowState> {
        let answers = session.config();
        self.update(move |mut state| {
            let mut seeded = answers;
            seeded.merge(state.config.clone());
            let route = state.route.or(seeded.route);
            state.config = seeded;
            if let Some(route) = route {
                state.set_route(route);
            }
            state
        })
        .await
    }
}
