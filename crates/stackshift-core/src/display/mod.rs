//! Markdown rendering of workflow state, batch sessions and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! wrapper types in [`results`] and [`status`] add the confirmation line a
//! command prints before the resource itself.
//!
//! ```text
//! ┌──────────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Domain Models     │    │ Result Wrappers │    │    Markdown     │
//! │ (WorkflowState,      │───▶│ & Status Lines  │───▶│     Output      │
//! │  BatchSession)       │    │                 │    │   (Terminal)    │
//! └──────────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use std::path::Path;
//!
//! use stackshift_core::display::UpdateResult;
//! use stackshift_core::models::{WorkflowState, WorkflowStep};
//!
//! let mut state = WorkflowState::new(Path::new("/home/user/project"));
//! state.complete_step(WorkflowStep::Analyze, None);
//!
//! let output = UpdateResult::with_changes(state, vec!["Completed analyze".to_string()])
//!     .to_string();
//! assert!(output.contains("Changes made:"));
//! assert!(output.contains("✓ 1. Analyze"));
//! ```

pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use datetime::LocalDateTime;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
