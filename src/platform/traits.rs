//! platform::traits
//!
//! Platform client trait definition for the GitHub Actions secrets API.
//!
//! # Design
//!
//! The `PlatformClient` trait is async because every operation involves
//! network I/O. Operations are grouped per scope the same way the GitHub
//! REST API groups them: organization, repository, and repository
//! environment. The secret manager never talks to this trait directly;
//! it goes through a scope adapter that picks one endpoint family.
//!
//! All methods return `Result` so callers can inspect the status code of a
//! failed call (see [`PlatformError::status`]). The manager only ever looks
//! at that status to recognise "not found" on reads.
//!
//! # Example
//!
//! ```ignore
//! use ghsecrets::platform::{PlatformClient, PlatformError};
//!
//! async fn show(client: &dyn PlatformClient) -> Result<(), PlatformError> {
//!     let key = client.get_repo_public_key("octocat", "hello-world").await?;
//!     println!("key id {}", key.key_id);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from platform operations.
///
/// These map to the common failure modes of the GitHub REST API. The
/// variants are kept distinct so callers can tell authentication,
/// rate-limiting, and network failures apart without parsing messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// The token was rejected (HTTP 401).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The token is valid but lacks access to the resource (HTTP 403).
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The request could not be built (bad base URL, bad header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl PlatformError {
    /// HTTP-style status code carried by this error, if any.
    ///
    /// Errors that never reached the server (network, request building,
    /// missing token) have no status.
    pub fn status(&self) -> Option<u16> {
        match self {
            PlatformError::AuthFailed(_) => Some(401),
            PlatformError::PermissionDenied(_) => Some(403),
            PlatformError::NotFound(_) => Some(404),
            PlatformError::RateLimited => Some(429),
            PlatformError::ApiError { status, .. } if *status != 0 => Some(*status),
            _ => None,
        }
    }

    /// True when the platform reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// A scope's public encryption key.
///
/// `key` is the base64 encoding of a 32-byte Curve25519 public key;
/// `key_id` tells the platform which of its private keys to decrypt with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// Base64 encoded key material
    #[serde(default)]
    pub key: String,
    /// Platform-assigned key identifier
    #[serde(default)]
    pub key_id: String,
}

impl PublicKey {
    /// Create a public key from its parts.
    pub fn new(key: impl Into<String>, key_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            key_id: key_id.into(),
        }
    }

    /// Check that both the key material and the key id are present.
    pub fn is_usable(&self) -> bool {
        !self.key.is_empty() && !self.key_id.is_empty()
    }
}

/// Visibility of an organization secret.
///
/// GitHub requires a visibility on every organization secret write.
/// `selected` visibility is not supported since it needs a repository list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Every repository in the organization can use the secret
    All,
    /// Only private (and internal) repositories can use the secret
    #[default]
    Private,
}

impl Visibility {
    /// Parse a visibility from its API name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(Visibility::All),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }

    /// The API name of this visibility.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::All => "all",
            Visibility::Private => "private",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Encrypted payload sent on create/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedSecret {
    /// Secret name
    pub name: String,
    /// Identifier of the public key the value was sealed with
    pub key_id: String,
    /// Base64 sealed-box ciphertext
    pub encrypted_value: String,
    /// Organization secrets only
    pub visibility: Option<Visibility>,
}

/// Secret metadata as returned by the platform.
///
/// The platform never returns the value itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretMetadata {
    /// Secret name (GitHub normalises names to upper case)
    pub name: String,
    /// When the secret was created
    pub created_at: DateTime<Utc>,
    /// When the secret was last updated
    pub updated_at: DateTime<Utc>,
    /// Organization secrets only (`all`, `private`, or `selected`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

/// Repository information needed to address environment secrets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Repository {
    /// Numeric repository id (`None` if the platform omitted it)
    pub id: Option<u64>,
    /// Repository name
    pub name: String,
    /// `owner/name`
    pub full_name: String,
}

/// The platform client for interacting with the GitHub Actions secrets API.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, PlatformError>`. Callers should handle:
/// - `AuthRequired` / `AuthFailed`: Prompt user to authenticate
/// - `PermissionDenied`: Token needs more access
/// - `NotFound`: Resource doesn't exist
/// - `RateLimited`: Back off and retry
/// - `ApiError`: Display error message to user
/// - `NetworkError`: Check connectivity
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Get the platform name (e.g., "github", "mock").
    fn name(&self) -> &'static str;

    /// Look up a repository by owner and name.
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, PlatformError>;

    // ---- organization ----

    /// Get the organization's public key for sealing secrets.
    async fn get_org_public_key(&self, org: &str) -> Result<PublicKey, PlatformError>;

    /// Create or update an organization secret.
    async fn create_or_update_org_secret(
        &self,
        org: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), PlatformError>;

    /// Get an organization secret's metadata.
    async fn get_org_secret(&self, org: &str, name: &str) -> Result<SecretMetadata, PlatformError>;

    /// Delete an organization secret.
    async fn delete_org_secret(&self, org: &str, name: &str) -> Result<(), PlatformError>;

    // ---- repository ----

    /// Get the repository's public key for sealing secrets.
    async fn get_repo_public_key(&self, owner: &str, repo: &str)
        -> Result<PublicKey, PlatformError>;

    /// Create or update a repository secret.
    async fn create_or_update_repo_secret(
        &self,
        owner: &str,
        repo: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), PlatformError>;

    /// Get a repository secret's metadata.
    async fn get_repo_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<SecretMetadata, PlatformError>;

    /// Delete a repository secret.
    async fn delete_repo_secret(&self, owner: &str, repo: &str, name: &str)
        -> Result<(), PlatformError>;

    // ---- environment ----

    /// Get an environment's public key for sealing secrets.
    ///
    /// Environments are addressed by numeric repository id, not by name.
    async fn get_env_public_key(
        &self,
        repository_id: u64,
        environment: &str,
    ) -> Result<PublicKey, PlatformError>;

    /// Create or update an environment secret.
    async fn create_or_update_env_secret(
        &self,
        repository_id: u64,
        environment: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), PlatformError>;

    /// Get an environment secret's metadata.
    async fn get_env_secret(
        &self,
        repository_id: u64,
        environment: &str,
        name: &str,
    ) -> Result<SecretMetadata, PlatformError>;

    /// Delete an environment secret.
    async fn delete_env_secret(
        &self,
        repository_id: u64,
        environment: &str,
        name: &str,
    ) -> Result<(), PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_error_display() {
        assert_eq!(
            format!("{}", PlatformError::AuthRequired),
            "authentication required"
        );
        assert_eq!(
            format!("{}", PlatformError::AuthFailed("expired token".into())),
            "authentication failed: expired token"
        );
        assert_eq!(
            format!("{}", PlatformError::PermissionDenied("secrets=write".into())),
            "permission denied: secrets=write"
        );
        assert_eq!(
            format!("{}", PlatformError::NotFound("secret FOO".into())),
            "not found: secret FOO"
        );
        assert_eq!(format!("{}", PlatformError::RateLimited), "rate limited");
        assert_eq!(
            format!(
                "{}",
                PlatformError::ApiError {
                    status: 422,
                    message: "Validation failed".into()
                }
            ),
            "API error: 422 - Validation failed"
        );
        assert_eq!(
            format!("{}", PlatformError::NetworkError("connection refused".into())),
            "network error: connection refused"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(PlatformError::NotFound("x".into()).status(), Some(404));
        assert_eq!(PlatformError::RateLimited.status(), Some(429));
        assert_eq!(
            PlatformError::ApiError {
                status: 500,
                message: "boom".into()
            }
            .status(),
            Some(500)
        );
        assert_eq!(
            PlatformError::ApiError {
                status: 0,
                message: "local".into()
            }
            .status(),
            None
        );
        assert_eq!(PlatformError::NetworkError("x".into()).status(), None);
        assert_eq!(PlatformError::AuthRequired.status(), None);
        assert_eq!(PlatformError::AuthFailed("x".into()).status(), Some(401));
        assert_eq!(PlatformError::PermissionDenied("x".into()).status(), Some(403));
    }

    #[test]
    fn only_404_is_not_found() {
        assert!(PlatformError::NotFound("x".into()).is_not_found());
        assert!(PlatformError::ApiError {
            status: 404,
            message: "gone".into()
        }
        .is_not_found());
        assert!(!PlatformError::AuthFailed("x".into()).is_not_found());
        assert!(!PlatformError::RateLimited.is_not_found());
    }

    #[test]
    fn public_key_usable() {
        assert!(PublicKey::new("abc", "1").is_usable());
        assert!(!PublicKey::new("", "1").is_usable());
        assert!(!PublicKey::new("abc", "").is_usable());
    }

    #[test]
    fn visibility_parse_and_display() {
        assert_eq!(Visibility::parse("all"), Some(Visibility::All));
        assert_eq!(Visibility::parse("PRIVATE"), Some(Visibility::Private));
        assert_eq!(Visibility::parse("selected"), None);
        assert_eq!(format!("{}", Visibility::All), "all");
        assert_eq!(Visibility::default(), Visibility::Private);
    }

    #[test]
    fn secret_metadata_deserializes_github_shape() {
        let json = r#"{
            "name": "GH_TOKEN",
            "created_at": "2019-08-10T14:59:22Z",
            "updated_at": "2020-01-10T14:59:22Z"
        }"#;
        let meta: SecretMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.name, "GH_TOKEN");
        assert!(meta.visibility.is_none());
        assert!(meta.updated_at > meta.created_at);
    }
}
