//! Workflow step identifiers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of workflow steps, declared in workflow order.
///
/// The derived `Ord` follows declaration order, so sorted collections of
/// steps are also in workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStep {
    /// Detect the tech stack and assess completeness
    Analyze,
    /// Extract documentation from the existing code
    ReverseEngineer,
    /// Turn documentation into formal specifications
    CreateSpecs,
    /// Compare specifications against the implementation
    GapAnalysis,
    /// Resolve clarification markers in the specifications
    CompleteSpec,
    /// Build what the specifications describe
    Implement,
}

impl WorkflowStep {
    /// Every step, in workflow order.
    pub const ALL: [WorkflowStep; 6] = [
        WorkflowStep::Analyze,
        WorkflowStep::ReverseEngineer,
        WorkflowStep::CreateSpecs,
        WorkflowStep::GapAnalysis,
        WorkflowStep::CompleteSpec,
        WorkflowStep::Implement,
    ];

    /// Identifier as stored on disk.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::Analyze => "analyze",
            WorkflowStep::ReverseEngineer => "reverse-engineer",
            WorkflowStep::CreateSpecs => "create-specs",
            WorkflowStep::GapAnalysis => "gap-analysis",
            WorkflowStep::CompleteSpec => "complete-spec",
            WorkflowStep::Implement => "implement",
        }
    }

    /// Human readable title.
    pub fn title(&self) -> &'static str {
        match self {
            WorkflowStep::Analyze => "Analyze",
            WorkflowStep::ReverseEngineer => "Reverse Engineer",
            WorkflowStep::CreateSpecs => "Create Specifications",
            WorkflowStep::GapAnalysis => "Gap Analysis",
            WorkflowStep::CompleteSpec => "Complete Specification",
            WorkflowStep::Implement => "Implement",
        }
    }

    /// 1-based position in the workflow.
    pub fn position(&self) -> usize {
        Self::ALL
            .iter()
            .position(|step| step == self)
            .map_or(0, |index| index + 1)
    }

    /// The step that follows this one, if any.
    pub fn next(&self) -> Option<WorkflowStep> {
        Self::ALL.get(self.position()).copied()
    }
}

impl FromStr for WorkflowStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|step| step.as_str() == normalized)
            .ok_or_else(|| format!("Invalid workflow step: {s}"))
    }
}
