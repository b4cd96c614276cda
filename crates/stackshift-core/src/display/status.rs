//! One-line status messages for commands that have no resource to show.

use std::fmt;

/// A success or failure line, e.g. the outcome of validating a path.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    /// Create a new success status.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// Create a new failure status.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "✓" } else { "✗" };
        writeln!(f, "{label} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_status_display() {
        let success = OperationStatus::success("Path is inside the project");
        assert_eq!(success.to_string(), "✓ Path is inside the project\n");

        let failure = OperationStatus::failure("Path rejected");
        assert!(failure.to_string().starts_with("✗"));
    }
}
