//! platform
//!
//! Abstraction for the code-hosting platform's Actions secrets API.
//!
//! # Architecture
//!
//! The `PlatformClient` trait defines the remote operations the secret
//! manager needs, grouped per scope. The manager is handed an
//! `Arc<dyn PlatformClient>` and never imports a concrete client.
//!
//! # Modules
//!
//! - `traits`: Core `PlatformClient` trait, error, and wire types
//! - [`github`]: GitHub implementation over the REST API
//! - [`mock`]: In-memory implementation for deterministic testing

pub mod github;
pub mod mock;
mod traits;

pub use traits::*;
