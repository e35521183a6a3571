//! cli::commands::get
//!
//! Show a secret's metadata.
//!
//! # Design
//!
//! An absent secret is a normal outcome, not an error: the command prints
//! "not found" and exits 0. With `--fail-missing` it exits with
//! [`MISSING_EXIT_CODE`] instead so scripts can branch on presence.
//!
//! # Example
//!
//! ```bash
//! ghsecrets --owner octocat --repo hello-world get API_TOKEN
//! ghsecrets --owner octocat get DEPLOY_KEY --json --fail-missing
//! ```

use std::process::ExitCode;

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Exit status for `get --fail-missing` on an absent secret.
pub const MISSING_EXIT_CODE: u8 = 2;

/// Show a secret's metadata.
pub async fn get(ctx: &Context, name: &str, json: bool, fail_missing: bool) -> Result<ExitCode> {
    let meta = ctx.manager.get_secret(name).await?;

    match (&meta, json) {
        (Some(meta), true) => println!("{}", serde_json::to_string_pretty(meta)?),
        (None, true) => println!("null"),
        (Some(meta), false) => output::print(output::format_metadata(meta), ctx.verbosity),
        (None, false) => output::print(format!("{}: not found", name), ctx.verbosity),
    }

    if meta.is_none() && fail_missing {
        return Ok(ExitCode::from(MISSING_EXIT_CODE));
    }
    Ok(ExitCode::SUCCESS)
}
