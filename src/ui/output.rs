//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Results go to stdout; diagnostics go to stderr. Everything except
//! errors and machine-readable output respects the quiet flag.

use std::fmt::Display;

use crate::platform::SecretMetadata;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a follow-up suggestion (always shown).
pub fn hint(message: impl Display) {
    eprintln!("hint: {}", message);
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Format secret metadata for humans.
pub fn format_metadata(meta: &SecretMetadata) -> String {
    let mut out = format!(
        "{}\n  created: {}\n  updated: {}",
        meta.name,
        meta.created_at.to_rfc3339(),
        meta.updated_at.to_rfc3339()
    );
    if let Some(visibility) = &meta.visibility {
        out.push_str(&format!("\n  visibility: {}", visibility));
    }
    out
}
