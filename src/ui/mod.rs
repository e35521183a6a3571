//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//! - [`prompts`] - Hidden value entry
//!
//! # Design
//!
//! All user-facing output and prompts go through this module so quiet mode
//! is handled in one place.

pub mod output;
pub mod prompts;
