//! Command-line argument definitions using clap.
//!
//! Argument structs carry clap attributes only; each converts into the core
//! type it stands for (`From<ConfigArgs> for WorkflowConfig`, and so on) so
//! the core crate stays free of CLI concerns.
//!
//! ```text
//! User Input → CLI Args (clap) → Core Types → StateStore / BatchSessionRegistry
//! ```

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::Value;
use stackshift_core::models::{
    ClarificationsStrategy, ImplementationScope, Route, WorkflowConfig, WorkflowMode,
    WorkflowStep,
};

/// Workflow state operations
#[derive(Subcommand)]
pub enum StateCommands {
    /// Show the workflow state
    Show,
    /// Create the state file if it does not exist yet
    Init(InitArgs),
    /// Mark a step as in progress
    Start(StepArgs),
    /// Mark a step as completed
    #[command(alias = "done")]
    Complete(CompleteStepArgs),
    /// Show the next step to work on
    Next,
    /// Choose the workflow route
    Route(RouteArgs),
    /// Update workflow options; with no options, show them
    Config(ConfigArgs),
    /// Delete the state file
    Reset,
}

/// Batch session operations
#[derive(Subcommand)]
pub enum BatchCommands {
    /// Start a batch session, replacing any existing one at the root
    Create(CreateBatchArgs),
    /// Show the batch session governing the project directory
    Show,
    /// Record a repository as processed
    Mark(MarkArgs),
    /// Record answers for questions not answered yet
    Answer(AnswerArgs),
    /// Remove the batch session file from a directory
    Clear(ClearArgs),
}

/// Initialize the workflow
#[derive(Args)]
pub struct InitArgs {
    /// Route to start with (greenfield or brownfield)
    #[arg(long)]
    pub route: Option<Route>,
}

/// A single workflow step
#[derive(Args)]
pub struct StepArgs {
    /// Step name, e.g. analyze or reverse-engineer
    pub step: WorkflowStep,
}

/// Complete a step, optionally recording details
#[derive(Args)]
pub struct CompleteStepArgs {
    /// Step name, e.g. analyze or reverse-engineer
    pub step: WorkflowStep,
    /// JSON value stored with the step
    #[arg(long)]
    pub details: Option<String>,
}

impl CompleteStepArgs {
    /// Parse the `--details` payload.
    pub fn details(&self) -> Result<Option<Value>> {
        self.details
            .as_deref()
            .map(|raw| serde_json::from_str(raw).context("--details must be valid JSON"))
            .transpose()
    }
}

/// Choose the route
#[derive(Args)]
pub struct RouteArgs {
    /// greenfield or brownfield
    pub route: Route,
}

/// Workflow options
#[derive(Args, Default)]
pub struct ConfigArgs {
    /// manual or cruise-control
    #[arg(long)]
    pub mode: Option<WorkflowMode>,
    /// defer, prompt or skip
    #[arg(long)]
    pub clarifications: Option<ClarificationsStrategy>,
    /// none, p0, p0-p1 or all
    #[arg(long)]
    pub scope: Option<ImplementationScope>,
    /// Target stack for a greenfield rebuild
    #[arg(long)]
    pub target_stack: Option<String>,
    /// Where a greenfield rebuild is written
    #[arg(long)]
    pub build_location: Option<String>,
    /// Where generated specifications are written
    #[arg(long)]
    pub spec_output: Option<String>,
}

impl From<ConfigArgs> for WorkflowConfig {
    fn from(val: ConfigArgs) -> Self {
        WorkflowConfig {
            route: None,
            mode: val.mode,
            clarifications_strategy: val.clarifications,
            implementation_scope: val.scope,
            target_stack: val.target_stack,
            build_location: val.build_location,
            spec_output_location: val.spec_output,
        }
    }
}

/// Start a batch session
#[derive(Args)]
pub struct CreateBatchArgs {
    /// Number of repositories in the batch
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub total: u32,
    /// Repositories processed per batch
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub batch_size: u32,
    /// JSON object of answers shared by every repository
    #[arg(long)]
    pub answers: Option<String>,
    /// Batch root directory. Defaults to the project directory
    pub root: Option<String>,
}

/// Record a processed repository
#[derive(Args)]
pub struct MarkArgs {
    /// Repository identifier, usually its directory name
    pub id: String,
}

/// Record shared answers
#[derive(Args)]
pub struct AnswerArgs {
    /// JSON object of answers
    #[arg(long)]
    pub answers: String,
}

/// Remove a batch session
#[derive(Args)]
pub struct ClearArgs {
    /// Directory holding the session file. Defaults to the project directory
    pub root: Option<String>,
}

/// Validate a path
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to check, relative to the current directory
    pub path: String,
}

/// Parse a JSON object of answers.
pub fn parse_answers(raw: Option<&str>) -> Result<BTreeMap<String, Value>> {
    match raw {
        Some(raw) => serde_json::from_str(raw).context("--answers must be a JSON object"),
        None => Ok(BTreeMap::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_args_into_workflow_config() {
        let args = ConfigArgs {
            mode: Some(WorkflowMode::CruiseControl),
            spec_output: Some("docs/specs".to_string()),
            ..ConfigArgs::default()
        };
        let config: WorkflowConfig = args.into();
        assert_eq!(config.mode, Some(WorkflowMode::CruiseControl));
        assert_eq!(config.spec_output_location.as_deref(), Some("docs/specs"));
        assert_eq!(config.route, None);
    }

    #[test]
    fn test_parse_answers() {
        let answers = parse_answers(Some(r#"{"route":"brownfield"}"#)).unwrap();
        assert_eq!(answers["route"], "brownfield");
        assert!(parse_answers(None).unwrap().is_empty());
        assert!(parse_answers(Some("[1, 2]")).is_err());
    }

    #[test]
    fn test_complete_step_details() {
        let args = CompleteStepArgs {
            step: WorkflowStep::Analyze,
            details: Some(r#"{"files": 3}"#.to_string()),
        };
        assert_eq!(args.details().unwrap(), Some(serde_json::json!({"files": 3})));

        let bad = CompleteStepArgs {
            step: WorkflowStep::Analyze,
            details: Some("{".to_string()),
        };
        assert!(bad.details().is_err());
    }
}
