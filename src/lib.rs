//! ghsecrets - Manage encrypted GitHub Actions secrets
//!
//! ghsecrets reads, writes, and deletes GitHub Actions secrets at
//! organization, repository, or deployment-environment scope through one
//! scope-agnostic interface. Values are sealed locally to the scope's
//! public key before they are sent.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the manager)
//! - [`manager`] - Scope resolution, public-key caching, and encryption
//! - [`platform`] - Abstraction for the secrets API (GitHub REST, in-memory mock)
//! - [`auth`] - API token providers
//! - [`core`] - Configuration file loading
//! - [`ui`] - User interaction utilities
//!
//! # Invariants
//!
//! 1. A manager resolves its scope at most once, on first use
//! 2. A manager fetches its scope's public key at most once
//! 3. Plaintext values never leave the process
//! 4. Reading an absent secret is not an error

pub mod auth;
pub mod cli;
pub mod core;
pub mod manager;
pub mod platform;
pub mod ui;
