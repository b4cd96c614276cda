use clap::{Parser, Subcommand};

use crate::cli::{BatchCommands, StateCommands, ValidateArgs};

/// Track the progress of a StackShift workflow in the current project
///
/// Workflow state lives in `.stackshift-state.json` inside the project
/// directory. A batch session in `.stackshift-batch-session.json` in a parent
/// directory shares answers and progress across many repositories. Every path
/// given on the command line must stay inside the directory the command is run
/// from.
#[derive(Parser)]
#[command(version, about, name = "stackshift")]
pub struct Args {
    /// Project directory, relative to the current directory. Defaults to the
    /// current directory
    #[arg(long, global = true)]
    pub directory: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the StackShift CLI
///
/// - `state`: inspect and advance the workflow of one project
/// - `batch`: manage the batch session shared by sibling projects
/// - `validate`: check whether a path is inside the allowed workspace
#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and advance the workflow state
    #[command(alias = "s")]
    State {
        #[command(subcommand)]
        command: StateCommands,
    },
    /// Manage the batch session
    #[command(alias = "b")]
    Batch {
        #[command(subcommand)]
        command: BatchCommands,
    },
    /// Check a path against the allowed workspace
    Validate(ValidateArgs),
}
