//! Data models for workflow state and batch sessions.
//!
//! These are the typed forms of the two persisted documents. Each document is
//! deserialized through serde (which enforces field types and the closed
//! enum sets) and then checked with its `validate` method for the invariants
//! serde cannot express:
//!
//! - [`WorkflowState`]: schema version, no duplicate completed steps, and a
//!   current step that is not already completed.
//! - [`BatchSession`]: the root directory matches the file location, and the
//!   processed ledger has no duplicates and never exceeds the batch total.
//!
//! Display implementations for these models live in [`crate::display`].
//!
//! # Examples
//!
//! ```rust
//! use std::path::Path;
//!
//! use stackshift_core::models::{WorkflowState, WorkflowStep};
//!
//! let mut state = WorkflowState::new(Path::new("/home/user/project"));
//! assert_eq!(state.current_step, None);
//! assert_eq!(state.next_step(), Some(WorkflowStep::Analyze));
//!
//! state.complete_step(WorkflowStep::Analyze, None);
//! assert_eq!(state.completed_steps, vec![WorkflowStep::Analyze]);
//! assert_eq!(state.current_step, Some(WorkflowStep::ReverseEngineer));
//! assert!(state.validate().is_empty());
//! ```

pub mod config;
pub mod session;
pub mod state;
pub mod status;
pub mod step;


pub use config::{ClarificationsStrategy, ImplementationScope, WorkflowConfig, WorkflowMode};
pub use session::BatchSession;
pub use state::{Progress, ProjectMetadata, StepDetail, WorkflowState, STATE_VERSION};
pub use status::{Route, StepStatus};
pub use step::WorkflowStep;
