//! StackShift CLI Application
//!
//! Command-line interface for the StackShift workflow state store.

mod args;
mod cli;
mod commands;
mod renderer;

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use commands::App;
use log::{debug, info};
use renderer::TerminalRenderer;
use stackshift_core::{PathValidator, StoreError, ValidationError};
use Commands::*;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let Args {
        directory,
        no_color,
        command,
    } = args;

    let cwd = env::current_dir().context("Failed to resolve the current directory")?;
    let validator = PathValidator::from_env(&cwd);
    let app = App::new(validator, directory, TerminalRenderer::new(!no_color));

    info!("StackShift started");

    match command {
        Some(State { command }) => app.handle_state_command(command).await,
        Some(Batch { command }) => app.handle_batch_command(command).await,
        Some(Validate(args)) => app.validate(&args),
        None => app.show_state().await,
    }
}

/// Print the externally safe message; internal details go to the log.
fn report(err: &anyhow::Error) {
    let validation = match err.downcast_ref::<StoreError>() {
        Some(StoreError::Validation(validation)) => Some(validation),
        Some(other) => {
            debug!("{other:?}");
            eprintln!("Error: {}", other.user_message());
            return;
        }
        None => err.downcast_ref::<ValidationError>(),
    };

    match validation {
        Some(validation) => {
            if let Some(details) = &validation.details {
                debug!("{}: {details}", validation.kind);
            }
            eprintln!("Error: {}", validation.user_message());
        }
        None => eprintln!("Error: {err:#}"),
    }
}
