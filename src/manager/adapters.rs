//! manager::adapters
//!
//! Scope adapters and the resolver that picks one.
//!
//! # Design
//!
//! A [`ScopeAdapter`] turns the four abstract secret operations into calls
//! against one endpoint family of the platform client. There are exactly
//! three implementations, and [`resolve`] picks one from the configuration
//! once per manager. Adapters do no encryption or validation; the manager
//! does that once for all of them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::errors::ManagerError;
use super::scope::{ManagerConfig, Scope};
use crate::platform::{
    EncryptedSecret, PlatformClient, PlatformError, PublicKey, SecretMetadata, Visibility,
};

/// The four secret operations for one scope.
#[async_trait]
pub trait ScopeAdapter: Send + Sync + std::fmt::Debug {
    /// The scope this adapter targets.
    fn scope(&self) -> Scope;

    /// Fetch the scope's public key.
    async fn get_public_key(&self) -> Result<PublicKey, PlatformError>;

    /// Create or update a secret from an already-sealed payload.
    async fn create_or_update_secret(&self, secret: &EncryptedSecret)
        -> Result<(), PlatformError>;

    /// Fetch a secret's metadata.
    async fn get_secret(&self, name: &str) -> Result<SecretMetadata, PlatformError>;

    /// Delete a secret.
    async fn delete_secret(&self, name: &str) -> Result<(), PlatformError>;
}

/// Organization secrets.
pub struct OrgSecrets {
    client: Arc<dyn PlatformClient>,
    org: String,
    visibility: Visibility,
}

impl OrgSecrets {
    /// Create an adapter for the secrets of `org`.
    pub fn new(client: Arc<dyn PlatformClient>, org: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            client,
            org: org.into(),
            visibility,
        }
    }
}

impl std::fmt::Debug for OrgSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrgSecrets")
            .field("client", &self.client.name())
            .field("org", &self.org)
            .field("visibility", &self.visibility)
            .finish()
    }
}

#[async_trait]
impl ScopeAdapter for OrgSecrets {
    fn scope(&self) -> Scope {
        Scope::Organization
    }

    async fn get_public_key(&self) -> Result<PublicKey, PlatformError> {
        self.client.get_org_public_key(&self.org).await
    }

    async fn create_or_update_secret(
        &self,
        secret: &EncryptedSecret,
    ) -> Result<(), PlatformError> {
        // organization writes must say who can read the secret
        let mut secret = secret.clone();
        secret.visibility.get_or_insert(self.visibility);
        self.client
            .create_or_update_org_secret(&self.org, &secret)
            .await
    }

    async fn get_secret(&self, name: &str) -> Result<SecretMetadata, PlatformError> {
        self.client.get_org_secret(&self.org, name).await
    }

    async fn delete_secret(&self, name: &str) -> Result<(), PlatformError> {
        self.client.delete_org_secret(&self.org, name).await
    }
}

/// Repository secrets.
pub struct RepoSecrets {
    client: Arc<dyn PlatformClient>,
    owner: String,
    repo: String,
}

impl RepoSecrets {
    /// Create an adapter for the secrets of `owner/repo`.
    pub fn new(
        client: Arc<dyn PlatformClient>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl std::fmt::Debug for RepoSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepoSecrets")
            .field("client", &self.client.name())
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish()
    }
}

#[async_trait]
impl ScopeAdapter for RepoSecrets {
    fn scope(&self) -> Scope {
        Scope::Repository
    }

    async fn get_public_key(&self) -> Result<PublicKey, PlatformError> {
        self.client.get_repo_public_key(&self.owner, &self.repo).await
    }

    async fn create_or_update_secret(
        &self,
        secret: &EncryptedSecret,
    ) -> Result<(), PlatformError> {
        self.client
            .create_or_update_repo_secret(&self.owner, &self.repo, secret)
            .await
    }

    async fn get_secret(&self, name: &str) -> Result<SecretMetadata, PlatformError> {
        self.client
            .get_repo_secret(&self.owner, &self.repo, name)
            .await
    }

    async fn delete_secret(&self, name: &str) -> Result<(), PlatformError> {
        self.client
            .delete_repo_secret(&self.owner, &self.repo, name)
            .await
    }
}

/// Environment secrets, addressed by numeric repository id.
pub struct EnvSecrets {
    client: Arc<dyn PlatformClient>,
    repository_id: u64,
    environment: String,
}

impl EnvSecrets {
    /// Create an adapter for the secrets of one environment.
    pub fn new(
        client: Arc<dyn PlatformClient>,
        repository_id: u64,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            client,
            repository_id,
            environment: environment.into(),
        }
    }

    /// The repository id resolved for this environment.
    pub fn repository_id(&self) -> u64 {
        self.repository_id
    }
}

impl std::fmt::Debug for EnvSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSecrets")
            .field("client", &self.client.name())
            .field("repository_id", &self.repository_id)
            .field("environment", &self.environment)
            .finish()
    }
}

#[async_trait]
impl ScopeAdapter for EnvSecrets {
    fn scope(&self) -> Scope {
        Scope::Environment
    }

    async fn get_public_key(&self) -> Result<PublicKey, PlatformError> {
        self.client
            .get_env_public_key(self.repository_id, &self.environment)
            .await
    }

    async fn create_or_update_secret(
        &self,
        secret: &EncryptedSecret,
    ) -> Result<(), PlatformError> {
        self.client
            .create_or_update_env_secret(self.repository_id, &self.environment, secret)
            .await
    }

    async fn get_secret(&self, name: &str) -> Result<SecretMetadata, PlatformError> {
        self.client
            .get_env_secret(self.repository_id, &self.environment, name)
            .await
    }

    async fn delete_secret(&self, name: &str) -> Result<(), PlatformError> {
        self.client
            .delete_env_secret(self.repository_id, &self.environment, name)
            .await
    }
}

/// Pick and build the adapter for `config`.
///
/// Organization and repository adapters are built locally. The environment
/// adapter needs the repository's numeric id, so it costs one lookup.
///
/// # Errors
///
/// - [`ManagerError::InvalidInput`] if the configuration is inconsistent
/// - [`ManagerError::Unable`] if the lookup returns no usable id
/// - [`ManagerError::Platform`] if the lookup itself fails
pub async fn resolve(
    config: &ManagerConfig,
    client: Arc<dyn PlatformClient>,
) -> Result<Box<dyn ScopeAdapter>, ManagerError> {
    config.validate()?;

    let owner = config.owner.as_str();
    let adapter: Box<dyn ScopeAdapter> = match (config.repo(), config.env()) {
        (None, _) => Box::new(OrgSecrets::new(
            client,
            owner,
            config.visibility.unwrap_or_default(),
        )),
        (Some(repo), None) => Box::new(RepoSecrets::new(client, owner, repo)),
        (Some(repo), Some(env)) => {
            debug!(owner, repo, "looking up repository id");
            let repository = client.get_repository(owner, repo).await?;
            let id = repository.id.filter(|id| *id != 0).ok_or_else(|| {
                ManagerError::Unable(format!(
                    "platform did not return a valid id for repository {}/{}",
                    owner, repo
                ))
            })?;
            Box::new(EnvSecrets::new(client, id, env))
        }
    };

    debug!(scope = %adapter.scope(), owner, "resolved secret scope");
    Ok(adapter)
}
