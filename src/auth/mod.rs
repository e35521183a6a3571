//! auth - bearer tokens for the GitHub API
//!
//! # Components
//!
//! - [`TokenProvider`] - Trait for providing bearer tokens to platform clients
//! - [`StaticTokenProvider`] - Fixed token, usually from `GH_TOKEN`
//! - [`AuthError`] - Authentication errors
//!
//! # Security
//!
//! Tokens MUST never appear in logs, error messages, or debug output.
//! All types in this module implement custom Debug to redact token values.
//!
//! # Example
//!
//! ```ignore
//! use ghsecrets::auth::{StaticTokenProvider, TokenProvider};
//! use std::sync::Arc;
//!
//! let provider: Arc<dyn TokenProvider> = Arc::new(StaticTokenProvider::from_env("github.com")?);
//! let token = provider.bearer_token().await?;
//! ```

mod errors;
mod provider;

pub use errors::AuthError;
pub use provider::{StaticTokenProvider, TOKEN_ENV_VARS};

/// Trait for providing bearer tokens to platform clients.
///
/// Implementors that can refresh tokens should return `true` from
/// [`TokenProvider::refreshes`]; the GitHub client then retries a request
/// once after a 401.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a valid bearer token, refreshing if necessary.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotAuthenticated`] if no token exists
    async fn bearer_token(&self) -> Result<String, AuthError>;

    /// Whether asking again may yield a different token.
    fn refreshes(&self) -> bool {
        false
    }

    /// Get the host this provider authenticates for.
    fn host(&self) -> &str;
}
