//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Gathers command-specific input
//! 2. Calls the [`SecretManager`](crate::manager::SecretManager)
//! 3. Formats and displays output
//!
//! Handlers are async because every secret operation involves network I/O.
//! `completion` is the exception and is dispatched before a context exists.

mod completion;
mod delete;
mod get;
mod set;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use delete::delete;
pub use get::{get, MISSING_EXIT_CODE};
pub use set::{read_value, set};

use std::process::ExitCode;

use anyhow::Result;

use crate::cli::args::Command;
use crate::cli::Context;

/// Dispatch a command to its handler.
pub async fn dispatch(command: Command, ctx: &Context) -> Result<ExitCode> {
    match command {
        Command::Get {
            name,
            json,
            fail_missing,
        } => get(ctx, &name, json, fail_missing).await,
        Command::Set { name, value, stdin } => {
            set(ctx, &name, value, stdin).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Delete { name } => {
            delete(ctx, &name).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Completion { shell } => {
            completion(shell)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
