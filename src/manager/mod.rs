//! manager
//!
//! Scope-agnostic facade over GitHub Actions secrets.
//!
//! # Architecture
//!
//! A [`SecretManager`] is built from a [`ManagerConfig`] and a shared
//! platform client. Construction does no I/O. The first operation
//! validates the configuration and resolves one [`ScopeAdapter`]
//! (organization, repository, or environment); every later operation
//! reuses it. The scope's public key is fetched on the first write and
//! cached for the manager's lifetime.
//!
//! ```text
//! SecretManager ──resolve once──▶ ScopeAdapter ──▶ PlatformClient
//!       │
//!       └── seal(value, cached public key)
//! ```
//!
//! # Concurrency
//!
//! Both the adapter and the key live in [`tokio::sync::OnceCell`]s. Concurrent
//! first calls wait on a single initialization; a failed initialization
//! leaves the cell empty so the next call retries.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ghsecrets::manager::{ManagerConfig, SecretManager};
//! use ghsecrets::platform::mock::MockPlatform;
//!
//! # tokio_test::block_on(async {
//! let platform = MockPlatform::new();
//! let config = ManagerConfig::new("octocat").with_repository("hello-world");
//! let manager = SecretManager::new(config, Arc::new(platform));
//!
//! manager.update_secret("API_TOKEN", "s3cr3t").await.unwrap();
//! let meta = manager.get_secret("API_TOKEN").await.unwrap().unwrap();
//! assert_eq!(meta.name, "API_TOKEN");
//!
//! manager.delete_secret("API_TOKEN").await.unwrap();
//! assert!(manager.get_secret("API_TOKEN").await.unwrap().is_none());
//! # });
//! ```

pub mod adapters;
pub mod crypto;
mod errors;
mod scope;

pub use adapters::{resolve, EnvSecrets, OrgSecrets, RepoSecrets, ScopeAdapter};
pub use errors::{ErrorKind, ManagerError};
pub use scope::{ManagerConfig, Scope};

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::platform::{EncryptedSecret, PlatformClient, PublicKey, SecretMetadata};

/// Manages secrets in one scope.
///
/// Cheap to construct; all I/O is deferred to the first operation.
pub struct SecretManager {
    config: ManagerConfig,
    client: Arc<dyn PlatformClient>,
    adapter: OnceCell<Box<dyn ScopeAdapter>>,
    public_key: OnceCell<PublicKey>,
}

impl std::fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretManager")
            .field("config", &self.config)
            .field("client", &self.client.name())
            .field("scope", &self.adapter.get().map(|a| a.scope()))
            .field("key_id", &self.public_key.get().map(|k| &k.key_id))
            .finish()
    }
}

impl SecretManager {
    /// Create a manager. Performs no validation and no I/O.
    pub fn new(config: ManagerConfig, client: Arc<dyn PlatformClient>) -> Self {
        Self {
            config,
            client,
            adapter: OnceCell::new(),
            public_key: OnceCell::new(),
        }
    }

    /// The configuration this manager was built with.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// The resolved scope, or `None` before the first successful operation.
    pub fn scope(&self) -> Option<Scope> {
        self.adapter.get().map(|a| a.scope())
    }

    /// Check if the scope adapter has been resolved.
    pub fn is_ready(&self) -> bool {
        self.adapter.initialized()
    }

    /// The cached public key, if a write has fetched one.
    pub fn cached_public_key(&self) -> Option<&PublicKey> {
        self.public_key.get()
    }

    /// Resolve the adapter on first use.
    async fn ensure_ready(&self) -> Result<&dyn ScopeAdapter, ManagerError> {
        let adapter = self
            .adapter
            .get_or_try_init(|| resolve(&self.config, Arc::clone(&self.client)))
            .await?;
        Ok(adapter.as_ref())
    }

    /// Fetch and validate the scope's public key on first use.
    async fn public_key(&self, adapter: &dyn ScopeAdapter) -> Result<&PublicKey, ManagerError> {
        self.public_key
            .get_or_try_init(|| async {
                debug!(scope = %adapter.scope(), "fetching public key");
                let key = adapter.get_public_key().await?;
                if !key.is_usable() {
                    return Err(ManagerError::Unable(
                        "platform returned an empty public key or key id".into(),
                    ));
                }
                Ok::<_, ManagerError>(key)
            })
            .await
    }

    /// Fetch a secret's metadata.
    ///
    /// Returns `Ok(None)` if the secret does not exist. The value itself is
    /// never readable.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::InvalidInput`] if the configuration is inconsistent
    /// - [`ManagerError::Unable`] if the environment's repository id is unusable
    /// - [`ManagerError::Platform`] for any platform failure other than not-found
    pub async fn get_secret(&self, name: &str) -> Result<Option<SecretMetadata>, ManagerError> {
        let adapter = self.ensure_ready().await?;
        match adapter.get_secret(name).await {
            Ok(meta) => Ok(Some(meta)),
            Err(e) if e.is_not_found() => {
                debug!(name, "secret not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Create or update a secret.
    ///
    /// The value is sealed locally to the scope's public key; the plaintext
    /// never leaves this process.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::InvalidInput`] if the configuration is inconsistent
    /// - [`ManagerError::Unable`] if the public key or key id is empty
    /// - [`ManagerError::Encryption`] if the public key is malformed
    /// - [`ManagerError::Platform`] if any platform call fails
    pub async fn update_secret(
        &self,
        name: &str,
        value: impl AsRef<[u8]>,
    ) -> Result<(), ManagerError> {
        let adapter = self.ensure_ready().await?;
        let key = self.public_key(adapter).await?;
        let encrypted_value = crypto::seal(&key.key, value.as_ref())?;

        adapter
            .create_or_update_secret(&EncryptedSecret {
                name: name.to_string(),
                key_id: key.key_id.clone(),
                encrypted_value,
                visibility: self
                    .config
                    .visibility
                    .filter(|_| adapter.scope() == Scope::Organization),
            })
            .await?;

        info!(name, scope = %adapter.scope(), "secret updated");
        Ok(())
    }

    /// Delete a secret.
    ///
    /// Deleting a secret that does not exist is a platform not-found error.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::InvalidInput`] if the configuration is inconsistent
    /// - [`ManagerError::Unable`] if the environment's repository id is unusable
    /// - [`ManagerError::Platform`] if the platform call fails
    pub async fn delete_secret(&self, name: &str) -> Result<(), ManagerError> {
        let adapter = self.ensure_ready().await?;
        adapter.delete_secret(name).await?;
        info!(name, scope = %adapter.scope(), "secret deleted");
        Ok(())
    }
}
