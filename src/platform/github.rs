//! platform::github
//!
//! GitHub platform client for the Actions secrets REST API.
//!
//! # Design
//!
//! This module implements the `PlatformClient` trait for GitHub. Every
//! operation is one REST call. Path segments (organization, repository,
//! environment and secret names) are percent-encoded when the URL is built,
//! so environment names with spaces work.
//!
//! # Authentication
//!
//! Tokens come from a [`TokenProvider`]. If the provider can refresh
//! tokens, a 401/403 response triggers one retry with a fresh token.
//!
//! # Rate Limiting
//!
//! GitHub has rate limits. This implementation:
//! - Returns `PlatformError::RateLimited` when limits are hit
//! - Does not implement automatic retry for rate limits (caller's responsibility)
//!
//! # Example
//!
//! ```ignore
//! use ghsecrets::auth::StaticTokenProvider;
//! use ghsecrets::platform::github::GitHubClient;
//! use ghsecrets::platform::PlatformClient;
//! use std::sync::Arc;
//!
//! let provider = Arc::new(StaticTokenProvider::from_env("github.com")?);
//! let client = GitHubClient::new(provider);
//! let key = client.get_repo_public_key("octocat", "hello-world").await?;
//! ```
//!
//! [`TokenProvider`]: crate::auth::TokenProvider

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{
    EncryptedSecret, PlatformClient, PlatformError, PublicKey, Repository, SecretMetadata,
    Visibility,
};
use crate::auth::TokenProvider;

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "ghsecrets";

/// GitHub REST API version header value.
const API_VERSION: &str = "2022-11-28";

/// GitHub platform client.
pub struct GitHubClient {
    /// HTTP client for making requests
    client: Client,
    /// Token provider
    token_provider: Arc<dyn TokenProvider>,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing anything from the token provider
impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("host", &self.token_provider.host())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubClient {
    /// Create a client for github.com.
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self::with_api_base(provider, DEFAULT_API_BASE)
    }

    /// Create a client with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise installations
    /// (e.g., `https://github.example.com/api/v3`) and for tests against a
    /// local mock server.
    pub fn with_api_base(provider: Arc<dyn TokenProvider>, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token_provider: provider,
            api_base: api_base.into(),
        }
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Get the current bearer token, refreshing if needed.
    async fn get_bearer_token(&self) -> Result<String, PlatformError> {
        self.token_provider.bearer_token().await.map_err(|e| {
            debug!(error = %e, "no bearer token");
            PlatformError::AuthRequired
        })
    }

    /// Build common headers for API requests (async to allow token refresh).
    async fn headers(&self) -> Result<HeaderMap, PlatformError> {
        let token = self.get_bearer_token().await?;
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            PlatformError::InvalidRequest("token is not a valid header value".into())
        })?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    /// Check if an error is a rejected token that a refresh might fix.
    fn is_retryable_auth_error(err: &PlatformError) -> bool {
        matches!(err, PlatformError::AuthFailed(_))
    }

    /// Build an API URL from path segments, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, PlatformError> {
        let mut url = Url::parse(&self.api_base).map_err(|e| {
            PlatformError::InvalidRequest(format!("invalid API base '{}': {}", self.api_base, e))
        })?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                PlatformError::InvalidRequest(format!(
                    "API base '{}' cannot carry a path",
                    self.api_base
                ))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Send a request, retrying once on auth failure if the provider refreshes.
    async fn send<B>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&B>,
    ) -> Result<Response, PlatformError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let result = self.send_once(method.clone(), url, body).await;

        match result {
            Err(ref e) if Self::is_retryable_auth_error(e) && self.token_provider.refreshes() => {
                debug!(path = url.path(), "retrying after auth failure");
                self.send_once(method, url, body).await
            }
            other => other,
        }
    }

    /// Send a request once and map non-success statuses to errors.
    async fn send_once<B>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&B>,
    ) -> Result<Response, PlatformError>
    where
        B: Serialize + Sync + ?Sized,
    {
        debug!(%method, path = url.path(), "github request");

        let mut request = self
            .client
            .request(method, url.clone())
            .headers(self.headers().await?);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PlatformError::NetworkError(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), "github response");

        if status.is_success() {
            Ok(response)
        } else {
            Self::handle_error_response(response, status).await
        }
    }

    /// GET a JSON resource.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, PlatformError> {
        let response = self.send(Method::GET, &url, None::<&()>).await?;
        let status = response.status();
        response.json().await.map_err(|e| PlatformError::ApiError {
            status: status.as_u16(),
            message: format!("Failed to parse response: {}", e),
        })
    }

    /// PUT a JSON body, ignoring the response body.
    async fn put_json<B: Serialize + Sync>(&self, url: Url, body: &B) -> Result<(), PlatformError> {
        self.send(Method::PUT, &url, Some(body)).await.map(|_| ())
    }

    /// DELETE a resource.
    async fn delete(&self, url: Url) -> Result<(), PlatformError> {
        self.send(Method::DELETE, &url, None::<&()>).await.map(|_| ())
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        response: Response,
        status: StatusCode,
    ) -> Result<T, PlatformError> {
        // Extract permission headers before consuming response body.
        // GitHub Apps use X-Accepted-GitHub-Permissions, classic OAuth uses X-Accepted-OAuth-Scopes.
        let headers = response.headers();
        let required_permissions = headers
            .get("X-Accepted-GitHub-Permissions")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let required_scopes = headers
            .get("X-Accepted-OAuth-Scopes")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let rate_limit_exhausted = headers
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "0");

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => {
                PlatformError::AuthFailed("Invalid or expired token".into())
            }
            // GitHub reports primary rate limiting as 403 with no requests remaining
            StatusCode::FORBIDDEN if rate_limit_exhausted => PlatformError::RateLimited,
            StatusCode::FORBIDDEN => {
                let mut err_msg = message;

                if let Some(perms) = required_permissions.filter(|p| !p.is_empty()) {
                    err_msg.push_str(&format!(" [required: {}]", perms));
                } else if let Some(scopes) = required_scopes.filter(|s| !s.is_empty()) {
                    err_msg.push_str(&format!(" [required scopes: {}]", scopes));
                }

                PlatformError::PermissionDenied(err_msg)
            }
            StatusCode::NOT_FOUND => PlatformError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => PlatformError::RateLimited,
            _ if status.is_server_error() => PlatformError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => PlatformError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl PlatformClient for GitHubClient {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, PlatformError> {
        let url = self.url(&["repos", owner, repo])?;
        let repo: GitHubRepository = self.get_json(url).await?;
        Ok(repo.into())
    }

    async fn get_org_public_key(&self, org: &str) -> Result<PublicKey, PlatformError> {
        let url = self.url(&["orgs", org, "actions", "secrets", "public-key"])?;
        self.get_json(url).await
    }

    async fn create_or_update_org_secret(
        &self,
        org: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), PlatformError> {
        let url = self.url(&["orgs", org, "actions", "secrets", &secret.name])?;
        self.put_json(url, &EncryptedSecretBody::from(secret)).await
    }

    async fn get_org_secret(&self, org: &str, name: &str) -> Result<SecretMetadata, PlatformError> {
        let url = self.url(&["orgs", org, "actions", "secrets", name])?;
        self.get_json(url).await
    }

    async fn delete_org_secret(&self, org: &str, name: &str) -> Result<(), PlatformError> {
        let url = self.url(&["orgs", org, "actions", "secrets", name])?;
        self.delete(url).await
    }

    async fn get_repo_public_key(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<PublicKey, PlatformError> {
        let url = self.url(&["repos", owner, repo, "actions", "secrets", "public-key"])?;
        self.get_json(url).await
    }

    async fn create_or_update_repo_secret(
        &self,
        owner: &str,
        repo: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), PlatformError> {
        let url = self.url(&["repos", owner, repo, "actions", "secrets", &secret.name])?;
        self.put_json(url, &EncryptedSecretBody::from(secret)).await
    }

    async fn get_repo_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<SecretMetadata, PlatformError> {
        let url = self.url(&["repos", owner, repo, "actions", "secrets", name])?;
        self.get_json(url).await
    }

    async fn delete_repo_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<(), PlatformError> {
        let url = self.url(&["repos", owner, repo, "actions", "secrets", name])?;
        self.delete(url).await
    }

    async fn get_env_public_key(
        &self,
        repository_id: u64,
        environment: &str,
    ) -> Result<PublicKey, PlatformError> {
        let id = repository_id.to_string();
        let url = self.url(&[
            "repositories",
            &id,
            "environments",
            environment,
            "secrets",
            "public-key",
        ])?;
        self.get_json(url).await
    }

    async fn create_or_update_env_secret(
        &self,
        repository_id: u64,
        environment: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), PlatformError> {
        let id = repository_id.to_string();
        let url = self.url(&[
            "repositories",
            &id,
            "environments",
            environment,
            "secrets",
            &secret.name,
        ])?;
        self.put_json(url, &EncryptedSecretBody::from(secret)).await
    }

    async fn get_env_secret(
        &self,
        repository_id: u64,
        environment: &str,
        name: &str,
    ) -> Result<SecretMetadata, PlatformError> {
        let id = repository_id.to_string();
        let url = self.url(&[
            "repositories",
            &id,
            "environments",
            environment,
            "secrets",
            name,
        ])?;
        self.get_json(url).await
    }

    async fn delete_env_secret(
        &self,
        repository_id: u64,
        environment: &str,
        name: &str,
    ) -> Result<(), PlatformError> {
        let id = repository_id.to_string();
        let url = self.url(&[
            "repositories",
            &id,
            "environments",
            environment,
            "secrets",
            name,
        ])?;
        self.delete(url).await
    }
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Request body for creating or updating a secret.
#[derive(Serialize)]
struct EncryptedSecretBody<'a> {
    encrypted_value: &'a str,
    key_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    visibility: Option<Visibility>,
}

impl<'a> From<&'a EncryptedSecret> for EncryptedSecretBody<'a> {
    fn from(secret: &'a EncryptedSecret) -> Self {
        Self {
            encrypted_value: &secret.encrypted_value,
            key_id: &secret.key_id,
            visibility: secret.visibility,
        }
    }
}

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// GitHub repository response (only the fields we use).
#[derive(Deserialize)]
struct GitHubRepository {
    id: Option<u64>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    full_name: String,
}

impl From<GitHubRepository> for Repository {
    fn from(repo: GitHubRepository) -> Self {
        Repository {
            id: repo.id,
            name: repo.name,
            full_name: repo.full_name,
        }
    }
}
