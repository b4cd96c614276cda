//! Core library for the StackShift workflow state store.
//!
//! This crate persists the progress of a multi-step code-transformation
//! workflow in a small JSON file per working directory, and shares answers
//! and a progress ledger across a batch of sibling directories through a
//! session file in a common ancestor.
//!
//! - [`security`]: [`PathValidator`] confines every caller-supplied path to
//!   an authorized set of base directories.
//! - [`file_io`]: size-bounded reads, forbidden-key stripping and atomic
//!   temp-file-plus-rename writes.
//! - [`store`]: [`StateStore`], the read-modify-write API over
//!   `.stackshift-state.json`.
//! - [`session`]: [`BatchSessionRegistry`], upward discovery and bookkeeping
//!   of `.stackshift-batch-session.json`.
//! - [`models`]: the typed documents and their invariant checks.
//! - [`display`]: markdown rendering for terminal output.
//!
//! Nothing in this crate reads the process working directory; callers pass
//! it in explicitly.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stackshift_core::{
//!     models::{Route, WorkflowStep},
//!     security::PathValidator,
//!     BatchSessionRegistry, StateStoreBuilder,
//! };
//!
//! # async fn example() -> stackshift_core::Result<()> {
//! let cwd = "/work/batch/repo-a";
//! let validator = PathValidator::new(cwd);
//!
//! let store = StateStoreBuilder::new(cwd)
//!     .with_validator(validator.clone())
//!     .build()?;
//! store.initialize(Some(Route::Brownfield)).await?;
//!
//! let registry = BatchSessionRegistry::new(validator);
//! if let Some(session) = registry.find(".").await? {
//!     store.adopt_session_answers(&session).await?;
//! }
//!
//! let state = store.complete_step(WorkflowStep::Analyze, None).await?;
//! println!("{state}");
//! # Ok(())
//! # }
//! ```

mod blocking;
pub mod display;
pub mod error;
pub mod file_io;
pub mod models;
pub mod security;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use display::{CreateResult, DeleteResult, LocalDateTime, OperationStatus, UpdateResult};
pub use error::{ErrorKind, Result, StoreError, ValidationError};
pub use models::{BatchSession, Route, WorkflowConfig, WorkflowState, WorkflowStep};
pub use security::PathValidator;
pub use session::{BatchSessionRegistry, GitRootMarker, RepoRootMarker};
pub use store::{StateStore, StateStoreBuilder};
