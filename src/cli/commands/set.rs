//! cli::commands::set
//!
//! Create or update a secret.
//!
//! # Value Sources
//!
//! In order of preference:
//! 1. `--value <V>`
//! 2. `--stdin`: all of standard input, minus one trailing newline
//! 3. A hidden prompt, when interactive
//!
//! The value is held in a [`Zeroizing`] buffer and wiped once sealed.

use std::io::Read;

use anyhow::{bail, Context as _, Result};
use zeroize::Zeroizing;

use crate::cli::Context;
use crate::ui::output;
use crate::ui::prompts::{self, PromptError};

/// Create or update a secret.
pub async fn set(ctx: &Context, name: &str, value: Option<String>, stdin: bool) -> Result<()> {
    let value = if let Some(value) = value {
        Zeroizing::new(value)
    } else if stdin {
        read_value(std::io::stdin().lock())?
    } else {
        match prompts::secret_value(&format!("Value for {}: ", name), ctx.interactive) {
            Ok(value) => value,
            Err(PromptError::NotInteractive) => {
                bail!("no value given; pass --value or --stdin")
            }
            Err(e) => return Err(e.into()),
        }
    };

    ctx.manager.update_secret(name, value.as_bytes()).await?;
    output::success(format!("Updated secret {}", name), ctx.verbosity);
    Ok(())
}

/// Read a value from `reader`, dropping one trailing newline.
pub fn read_value(mut reader: impl Read) -> Result<Zeroizing<String>> {
    let mut value = Zeroizing::new(String::new());
    reader
        .read_to_string(&mut value)
        .context("failed to read value from stdin")?;

    if value.ends_with('\n') {
        value.pop();
        if value.ends_with('\r') {
            value.pop();
        }
    }
    Ok(value)
}
