//! Status enumerations for workflows and steps.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification of the workflow mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Extract business logic only, for a rebuild on a new stack
    Greenfield,
    /// Specify the existing implementation in place
    Brownfield,
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "greenfield" => Ok(Route::Greenfield),
            "brownfield" => Ok(Route::Brownfield),
            _ => Err(format!("Invalid route: {s}")),
        }
    }
}

impl Route {
    /// String representation as stored on disk.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Greenfield => "greenfield",
            Route::Brownfield => "brownfield",
        }
    }

    /// One-line description used as the default `pathDescription`.
    pub fn description(&self) -> &'static str {
        match self {
            Route::Greenfield => "Shift to a new tech stack (business logic only)",
            Route::Brownfield => "Manage the existing code with specifications",
        }
    }
}

/// Progress of an individual step in the audit trail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    /// Step has been started
    InProgress,

    /// Step has been completed
    Completed,
}

impl StepStatus {
    /// String representation as stored on disk.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::InProgress => "in-progress",
            StepStatus::Completed => "completed",
        }
    }

    /// Status with a consistent icon for display.
    ///
    /// ```rust
    /// use stackshift_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(StepStatus::InProgress.with_icon(), "➤ In Progress");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Completed => "✓ Completed",
            StepStatus::InProgress => "➤ In Progress",
        }
    }
}
