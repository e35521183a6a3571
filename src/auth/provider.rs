//! auth::provider
//!
//! StaticTokenProvider - a TokenProvider backed by a fixed token.
//!
//! The token usually comes from `GH_TOKEN` / `GITHUB_TOKEN` or the
//! `--token` flag. It is never refreshed, so a platform client built on it
//! does not retry auth failures.

use super::errors::AuthError;
use super::TokenProvider;

/// Environment variables searched for a token, in order.
pub const TOKEN_ENV_VARS: &[&str] = &["GH_TOKEN", "GITHUB_TOKEN"];

/// Token provider that hands out one fixed token.
pub struct StaticTokenProvider {
    /// Host the token belongs to (e.g., "github.com")
    host: String,
    /// The bearer token
    token: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("host", &self.host)
            .field("token", &"[redacted]")
            .finish()
    }
}

impl StaticTokenProvider {
    /// Create a provider for the given host and token.
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: token.into(),
        }
    }

    /// Create a provider from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] if none of [`TOKEN_ENV_VARS`]
    /// holds a non-empty value.
    pub fn from_env(host: &str) -> Result<Self, AuthError> {
        token_from_lookup(host, |name| std::env::var(name).ok()).map(|t| Self::new(host, t))
    }
}

#[async_trait::async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        if self.token.is_empty() {
            return Err(AuthError::NotAuthenticated(self.host.clone()));
        }
        Ok(self.token.clone())
    }

    fn host(&self) -> &str {
        &self.host
    }
}

/// Pick the first non-empty token from [`TOKEN_ENV_VARS`] using `lookup`.
pub(crate) fn token_from_lookup(
    host: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, AuthError> {
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .ok_or_else(|| AuthError::NotAuthenticated(host.to_string()))
}
