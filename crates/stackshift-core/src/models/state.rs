//! Workflow state document.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Route, StepStatus, WorkflowConfig, WorkflowStep};
use crate::error::ValidationError;
use crate::file_io::strip_forbidden_keys;

/// Schema version written to, and required from, every state file.
pub const STATE_VERSION: &str = "1.0.0";

/// Persisted progress of one working directory
/// (`<dir>/.stackshift-state.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    /// Schema version, must equal [`STATE_VERSION`]
    pub version: String,

    /// When the state was first written (UTC)
    pub created: Timestamp,

    /// When the state was last written (UTC)
    pub updated: Timestamp,

    /// Workflow classification, unset until chosen
    pub route: Option<Route>,

    /// Step in progress; `None` before start and after the last step
    pub current_step: Option<WorkflowStep>,

    /// Steps in completion order
    #[serde(default)]
    pub completed_steps: Vec<WorkflowStep>,

    pub metadata: ProjectMetadata,

    #[serde(default)]
    pub config: WorkflowConfig,

    /// Per-step audit trail
    #[serde(default)]
    pub step_details: BTreeMap<WorkflowStep, StepDetail>,
}

/// Describes the project a state file belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub project_name: String,
    pub project_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_description: Option<String>,
}

/// Audit entry for one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDetail {
    pub started: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<Timestamp>,
    pub status: StepStatus,
    /// Free-form payload supplied by the orchestration layer
    #[serde(default)]
    pub details: Value,
}

/// Completed versus total step counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Whole-number percentage of completed steps.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        self.completed * 100 / self.total
    }
}

impl WorkflowState {
    /// Fresh state for `project_dir`: nothing started, nothing completed.
    pub fn new(project_dir: &Path) -> Self {
        let now = Timestamp::now();
        let project_name = project_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        Self {
            version: STATE_VERSION.to_string(),
            created: now,
            updated: now,
            route: None,
            current_step: None,
            completed_steps: Vec::new(),
            metadata: ProjectMetadata {
                project_name,
                project_path: project_dir.display().to_string(),
                path_description: None,
            },
            config: WorkflowConfig::default(),
            step_details: BTreeMap::new(),
        }
    }

    /// Check the invariants serde cannot express. Returns one message per
    /// violation; an empty vector means the state is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.version != STATE_VERSION {
            errors.push(format!(
                "version '{}' does not match expected '{STATE_VERSION}'",
                self.version
            ));
        }

        let mut seen = HashSet::new();
        for step in &self.completed_steps {
            if !seen.insert(*step) {
                errors.push(format!("completedSteps contains '{}' twice", step.as_str()));
            }
        }

        if let Some(current) = self.current_step {
            if seen.contains(&current) {
                errors.push(format!(
                    "currentStep '{}' is already completed",
                    current.as_str()
                ));
            }
        }
        errors
    }

    /// True if `step` has been completed.
    pub fn is_completed(&self, step: WorkflowStep) -> bool {
        self.completed_steps.contains(&step)
    }

    /// First step, in workflow order, that is not completed yet.
    pub fn next_step(&self) -> Option<WorkflowStep> {
        WorkflowStep::ALL
            .into_iter()
            .find(|step| !self.is_completed(*step))
    }

    /// Completed versus total step counts.
    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.completed_steps.len(),
            total: WorkflowStep::ALL.len(),
        }
    }

    /// Set the route and mirror it into the config.
    pub fn set_route(&mut self, route: Route) {
        self.route = Some(route);
        self.config.route = Some(route);
        self.metadata.path_description = Some(route.description().to_string());
    }

    /// Mark `step` as the one in progress.
    pub fn start_step(&mut self, step: WorkflowStep) -> Result<(), ValidationError> {
        if self.is_completed(step) {
            return Err(ValidationError::invalid_input(format!(
                "Step '{}' is already completed",
                step.as_str()
            ))
            .finish());
        }
        self.current_step = Some(step);
        self.step_details
            .entry(step)
            .or_insert_with(|| StepDetail {
                started: Timestamp::now(),
                completed: None,
                status: StepStatus::InProgress,
                details: Value::Null,
            });
        Ok(())
    }

    /// Record `step` as completed. Completing an already completed step only
    /// refreshes its details.
    ///
    /// When `step` was the current step, the current step moves on to the
    /// next uncompleted one (or `None` once everything is done).
    pub fn complete_step(&mut self, step: WorkflowStep, details: Option<Value>) {
        let now = Timestamp::now();
        if !self.is_completed(step) {
            self.completed_steps.push(step);
        }

        let entry = self.step_details.entry(step).or_insert_with(|| StepDetail {
            started: now,
            completed: None,
            status: StepStatus::InProgress,
            details: Value::Null,
        });
        entry.completed = Some(now);
        entry.status = StepStatus::Completed;
        if let Some(mut details) = details {
            strip_forbidden_keys(&mut details);
            entry.details = details;
        }

        if self.current_step.map_or(true, |current| current == step) {
            self.current_step = self.next_step();
        }
    }
}
