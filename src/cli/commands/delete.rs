//! delete command - Delete a secret
//!
//! Deleting a secret that does not exist fails with the platform's
//! not-found error.

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Delete a secret.
pub async fn delete(ctx: &Context, name: &str) -> Result<()> {
    ctx.manager.delete_secret(name).await?;
    output::success(format!("Deleted secret {}", name), ctx.verbosity);
    Ok(())
}
