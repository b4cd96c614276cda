//! Display implementations for domain models.
//!
//! Enums print their on-disk spelling. [`WorkflowState`] and
//! [`BatchSession`] print as markdown documents with a metadata list followed
//! by sections.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    BatchSession, ClarificationsStrategy, ImplementationScope, Progress, Route, StepStatus,
    WorkflowConfig, WorkflowMode, WorkflowState, WorkflowStep,
};

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(
    WorkflowStep,
    Route,
    StepStatus,
    WorkflowMode,
    ClarificationsStrategy,
    ImplementationScope,
);

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.completed, self.total, self.percent())
    }
}

impl WorkflowState {
    fn step_icon(&self, step: WorkflowStep) -> &'static str {
        if self.is_completed(step) {
            "✓"
        } else if self.current_step == Some(step) {
            "➤"
        } else {
            "○"
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Workflow: {}", self.metadata.project_name)?;
        writeln!(f)?;

        match self.route {
            Some(route) => writeln!(f, "- Route: {route}")?,
            None => writeln!(f, "- Route: not chosen")?,
        }
        match self.current_step {
            Some(step) => writeln!(f, "- Current step: {}. {}", step.position(), step.title())?,
            None if self.next_step().is_none() => writeln!(f, "- Current step: done")?,
            None => writeln!(f, "- Current step: not started")?,
        }
        writeln!(f, "- Progress: {}", self.progress())?;
        writeln!(f, "- Directory: {}", self.metadata.project_path)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated))?;

        if let Some(description) = &self.metadata.path_description {
            writeln!(f)?;
            writeln!(f, "{description}")?;
        }

        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for step in WorkflowStep::ALL {
            write!(
                f,
                "- {} {}. {}",
                self.step_icon(step),
                step.position(),
                step.title()
            )?;
            if let Some(detail) = self.step_details.get(&step) {
                let when = detail.completed.as_ref().unwrap_or(&detail.started);
                write!(f, " ({}, {})", detail.status, LocalDateTime(when))?;
            }
            writeln!(f)?;
        }

        if !self.config.is_empty() {
            writeln!(f, "\n## Configuration")?;
            writeln!(f)?;
            write!(f, "{}", self.config)?;
        }

        Ok(())
    }
}

impl fmt::Display for WorkflowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(route) = self.route {
            writeln!(f, "- **route**: {route}")?;
        }
        if let Some(mode) = self.mode {
            writeln!(f, "- **mode**: {mode}")?;
        }
        if let Some(strategy) = self.clarifications_strategy {
            writeln!(f, "- **clarificationsStrategy**: {strategy}")?;
        }
        if let Some(scope) = self.implementation_scope {
            writeln!(f, "- **implementationScope**: {scope}")?;
        }
        if let Some(stack) = &self.target_stack {
            writeln!(f, "- **targetStack**: {stack}")?;
        }
        if let Some(location) = &self.build_location {
            writeln!(f, "- **buildLocation**: {location}")?;
        }
        if let Some(location) = &self.spec_output_location {
            writeln!(f, "- **specOutputLocation**: {location}")?;
        }
        Ok(())
    }
}

impl fmt::Display for BatchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Batch session {}", self.session_id)?;
        writeln!(f)?;
        writeln!(f, "- Root: {}", self.batch_root_directory.display())?;
        writeln!(f, "- Started: {}", LocalDateTime(&self.started_at))?;
        writeln!(
            f,
            "- Processed: {}/{} (batches of {})",
            self.processed_repos.len(),
            self.total_repos,
            self.batch_size
        )?;
        if self.is_complete() {
            writeln!(f, "- Remaining: none, batch complete")?;
        } else {
            writeln!(f, "- Remaining: {}", self.remaining())?;
        }

        if !self.answers.is_empty() {
            writeln!(f, "\n## Answers")?;
            writeln!(f)?;
            for (key, value) in &self.answers {
                writeln!(f, "- **{key}**: {value}")?;
            }
        }

        if self.processed_repos.is_empty() {
            writeln!(f, "\nNo repositories processed yet.")?;
        } else {
            writeln!(f, "\n## Processed")?;
            writeln!(f)?;
            for (index, repo) in self.processed_repos.iter().enumerate() {
                writeln!(f, "{}. {repo}", index + 1)?;
            }
        }

        Ok(())
    }
}
