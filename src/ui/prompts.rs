//! ui::prompts
//!
//! Interactive prompts.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode the
//! caller must supply the value another way, so prompting fails with a
//! clear error instead of blocking.

use std::io::IsTerminal;

use thiserror::Error;
use zeroize::Zeroizing;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Check if stdin is a terminal.
pub fn stdin_is_terminal() -> bool {
    std::io::stdin().is_terminal()
}

/// Prompt for a secret value without echoing it.
///
/// An empty entry is treated as cancellation. The returned buffer is
/// wiped when dropped.
pub fn secret_value(message: &str, interactive: bool) -> Result<Zeroizing<String>, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    let value = Zeroizing::new(
        rpassword::prompt_password(message).map_err(|e| PromptError::IoError(e.to_string()))?,
    );
    if value.is_empty() {
        return Err(PromptError::Cancelled);
    }
    Ok(value)
}
