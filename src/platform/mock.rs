//! platform::mock
//!
//! Mock platform implementation for deterministic testing.
//!
//! # Design
//!
//! The mock platform stores secrets in memory, keyed by scope and
//! upper-cased name (GitHub normalises secret names the same way). Each
//! scope gets its own real key pair on first use, so tests can unseal
//! what the manager stored and check it round-trips. Operations are
//! recorded and failures can be injected per operation.
//!
//! # Example
//!
//! ```
//! use ghsecrets::platform::mock::MockPlatform;
//! use ghsecrets::platform::PlatformClient;
//!
//! # tokio_test::block_on(async {
//! let platform = MockPlatform::new().with_repository("octocat", "hello-world", Some(42));
//!
//! let repo = platform.get_repository("octocat", "hello-world").await.unwrap();
//! assert_eq!(repo.id, Some(42));
//!
//! let key = platform.get_repo_public_key("octocat", "hello-world").await.unwrap();
//! assert!(key.is_usable());
//! # });
//! ```

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use crypto_box::aead::OsRng;
use crypto_box::SecretKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{
    EncryptedSecret, PlatformClient, PlatformError, PublicKey, Repository, SecretMetadata,
};

/// Identifies one secret namespace on the mock platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    /// Organization secrets
    Org(String),
    /// Repository secrets (owner, repo)
    Repo(String, String),
    /// Environment secrets (repository id, environment)
    Env(u64, String),
}

impl ScopeKey {
    /// Organization scope key.
    pub fn org(org: &str) -> Self {
        ScopeKey::Org(org.to_string())
    }

    /// Repository scope key.
    pub fn repo(owner: &str, repo: &str) -> Self {
        ScopeKey::Repo(owner.to_string(), repo.to_string())
    }

    /// Environment scope key.
    pub fn env(repository_id: u64, environment: &str) -> Self {
        ScopeKey::Env(repository_id, environment.to_string())
    }
}

/// A secret as the mock platform stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSecret {
    /// Metadata returned by reads
    pub metadata: SecretMetadata,
    /// Key id the value was sealed with
    pub key_id: String,
    /// Base64 sealed-box ciphertext
    pub encrypted_value: String,
}

/// Mock platform for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Clone)]
pub struct MockPlatform {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockPlatformInner>>,
}

/// Internal mutable state.
struct MockPlatformInner {
    /// Repositories by (owner, name).
    repositories: HashMap<(String, String), Repository>,
    /// Per-scope key pairs, generated on first use.
    keys: HashMap<ScopeKey, (SecretKey, String)>,
    /// Public keys served instead of the generated ones.
    key_overrides: HashMap<ScopeKey, PublicKey>,
    /// Stored secrets by scope and upper-cased name.
    secrets: HashMap<(ScopeKey, String), StoredSecret>,
    /// Next key id suffix.
    next_key_id: u64,
    /// Operation to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail get_repository with the given error.
    GetRepository(PlatformError),
    /// Fail every get_*_public_key with the given error.
    GetPublicKey(PlatformError),
    /// Fail every create_or_update_*_secret with the given error.
    CreateOrUpdateSecret(PlatformError),
    /// Fail every get_*_secret with the given error.
    GetSecret(PlatformError),
    /// Fail every delete_*_secret with the given error.
    DeleteSecret(PlatformError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    GetRepository {
        owner: String,
        repo: String,
    },
    GetPublicKey {
        scope: ScopeKey,
    },
    CreateOrUpdateSecret {
        scope: ScopeKey,
        name: String,
        key_id: String,
        encrypted_value: String,
    },
    GetSecret {
        scope: ScopeKey,
        name: String,
    },
    DeleteSecret {
        scope: ScopeKey,
        name: String,
    },
}

impl std::fmt::Debug for MockPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap();
        f.debug_struct("MockPlatform")
            .field("repositories", &inner.repositories.len())
            .field("secrets", &inner.secrets.len())
            .field("operations", &inner.operations.len())
            .finish()
    }
}

impl MockPlatform {
    /// Create a new empty mock platform.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockPlatformInner {
                repositories: HashMap::new(),
                keys: HashMap::new(),
                key_overrides: HashMap::new(),
                secrets: HashMap::new(),
                next_key_id: 1,
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Register a repository. `id` of `None` simulates a response without an id.
    pub fn with_repository(self, owner: &str, repo: &str, id: Option<u64>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.repositories.insert(
                (owner.to_string(), repo.to_string()),
                Repository {
                    id,
                    name: repo.to_string(),
                    full_name: format!("{}/{}", owner, repo),
                },
            );
        }
        self
    }

    /// Serve `key` as the public key for `scope` instead of a generated one.
    pub fn with_public_key(self, scope: ScopeKey, key: PublicKey) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.key_overrides.insert(scope, key);
        }
        self
    }

    /// Pre-populate a secret (value unknown) in the given scope.
    pub fn with_secret(self, scope: ScopeKey, name: &str) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let now = Utc::now();
            let visibility = matches!(scope, ScopeKey::Org(_)).then(|| "private".to_string());
            inner.secrets.insert(
                (scope, name.to_uppercase()),
                StoredSecret {
                    metadata: SecretMetadata {
                        name: name.to_uppercase(),
                        created_at: now,
                        updated_at: now,
                        visibility,
                    },
                    key_id: String::new(),
                    encrypted_value: String::new(),
                },
            );
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use ghsecrets::platform::mock::{MockPlatform, FailOn};
    /// use ghsecrets::platform::PlatformError;
    ///
    /// let platform = MockPlatform::new()
    ///     .fail_on(FailOn::GetPublicKey(PlatformError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.set_fail_on(fail_on);
        self
    }

    /// Configure a failure on a shared handle.
    pub fn set_fail_on(&self, fail_on: FailOn) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = Some(fail_on);
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Count recorded operations matching a predicate.
    pub fn count_operations(&self, pred: impl Fn(&MockOperation) -> bool) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.operations.iter().filter(|op| pred(op)).count()
    }

    /// Get a stored secret (for test verification).
    pub fn stored_secret(&self, scope: &ScopeKey, name: &str) -> Option<StoredSecret> {
        let inner = self.inner.lock().unwrap();
        inner
            .secrets
            .get(&(scope.clone(), name.to_uppercase()))
            .cloned()
    }

    /// Get the count of stored secrets.
    pub fn secret_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.secrets.len()
    }

    /// Unseal a stored secret with the scope's private key.
    ///
    /// Returns `None` if the secret does not exist, was sealed for another
    /// key, or does not decrypt.
    pub fn reveal(&self, scope: &ScopeKey, name: &str) -> Option<Vec<u8>> {
        let inner = self.inner.lock().unwrap();
        let stored = inner.secrets.get(&(scope.clone(), name.to_uppercase()))?;
        let (secret_key, key_id) = inner.keys.get(scope)?;
        if *key_id != stored.key_id {
            return None;
        }
        let sealed = STANDARD.decode(&stored.encrypted_value).ok()?;
        secret_key.unseal(&sealed).ok()
    }

    /// Record an operation.
    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail(&self, expected: &str) -> Result<(), PlatformError> {
        let inner = self.inner.lock().unwrap();
        match &inner.fail_on {
            Some(FailOn::GetRepository(e)) if expected == "get_repository" => Err(e.clone()),
            Some(FailOn::GetPublicKey(e)) if expected == "get_public_key" => Err(e.clone()),
            Some(FailOn::CreateOrUpdateSecret(e)) if expected == "create_or_update_secret" => {
                Err(e.clone())
            }
            Some(FailOn::GetSecret(e)) if expected == "get_secret" => Err(e.clone()),
            Some(FailOn::DeleteSecret(e)) if expected == "delete_secret" => Err(e.clone()),
            _ => Ok(()),
        }
    }

    fn public_key(&self, scope: ScopeKey) -> Result<PublicKey, PlatformError> {
        self.record(MockOperation::GetPublicKey {
            scope: scope.clone(),
        });
        self.check_fail("get_public_key")?;

        let mut inner = self.inner.lock().unwrap();
        if let Some(key) = inner.key_overrides.get(&scope) {
            return Ok(key.clone());
        }
        if !inner.keys.contains_key(&scope) {
            let key_id = format!("mock-key-{}", inner.next_key_id);
            inner.next_key_id += 1;
            inner
                .keys
                .insert(scope.clone(), (SecretKey::generate(&mut OsRng), key_id));
        }
        let (secret_key, key_id) = &inner.keys[&scope];
        Ok(PublicKey::new(
            STANDARD.encode(secret_key.public_key().as_bytes()),
            key_id.clone(),
        ))
    }

    fn put_secret(&self, scope: ScopeKey, secret: &EncryptedSecret) -> Result<(), PlatformError> {
        self.record(MockOperation::CreateOrUpdateSecret {
            scope: scope.clone(),
            name: secret.name.clone(),
            key_id: secret.key_id.clone(),
            encrypted_value: secret.encrypted_value.clone(),
        });
        self.check_fail("create_or_update_secret")?;

        let mut inner = self.inner.lock().unwrap();
        let known_key = inner.keys.get(&scope).map(|(_, id)| id.as_str())
            == Some(secret.key_id.as_str())
            || inner
                .key_overrides
                .get(&scope)
                .is_some_and(|k| k.key_id == secret.key_id);
        if !known_key {
            return Err(PlatformError::ApiError {
                status: 422,
                message: format!("unknown key_id '{}'", secret.key_id),
            });
        }

        let name = secret.name.to_uppercase();
        let now = Utc::now();
        let visibility = secret.visibility.map(|v| v.to_string());
        let created_at = inner
            .secrets
            .get(&(scope.clone(), name.clone()))
            .map(|s| s.metadata.created_at)
            .unwrap_or(now);

        inner.secrets.insert(
            (scope, name.clone()),
            StoredSecret {
                metadata: SecretMetadata {
                    name,
                    created_at,
                    updated_at: now,
                    visibility,
                },
                key_id: secret.key_id.clone(),
                encrypted_value: secret.encrypted_value.clone(),
            },
        );
        Ok(())
    }

    fn get_secret(&self, scope: ScopeKey, name: &str) -> Result<SecretMetadata, PlatformError> {
        self.record(MockOperation::GetSecret {
            scope: scope.clone(),
            name: name.to_string(),
        });
        self.check_fail("get_secret")?;

        let inner = self.inner.lock().unwrap();
        inner
            .secrets
            .get(&(scope, name.to_uppercase()))
            .map(|s| s.metadata.clone())
            .ok_or_else(|| PlatformError::NotFound(format!("secret {}", name)))
    }

    fn delete_secret(&self, scope: ScopeKey, name: &str) -> Result<(), PlatformError> {
        self.record(MockOperation::DeleteSecret {
            scope: scope.clone(),
            name: name.to_string(),
        });
        self.check_fail("delete_secret")?;

        let mut inner = self.inner.lock().unwrap();
        inner
            .secrets
            .remove(&(scope, name.to_uppercase()))
            .map(|_| ())
            .ok_or_else(|| PlatformError::NotFound(format!("secret {}", name)))
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformClient for MockPlatform {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, PlatformError> {
        self.record(MockOperation::GetRepository {
            owner: owner.to_string(),
            repo: repo.to_string(),
        });
        self.check_fail("get_repository")?;

        let inner = self.inner.lock().unwrap();
        inner
            .repositories
            .get(&(owner.to_string(), repo.to_string()))
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(format!("repository {}/{}", owner, repo)))
    }

    async fn get_org_public_key(&self, org: &str) -> Result<PublicKey, PlatformError> {
        self.public_key(ScopeKey::org(org))
    }

    async fn create_or_update_org_secret(
        &self,
        org: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), PlatformError> {
        self.put_secret(ScopeKey::org(org), secret)
    }

    async fn get_org_secret(&self, org: &str, name: &str) -> Result<SecretMetadata, PlatformError> {
        self.get_secret(ScopeKey::org(org), name)
    }

    async fn delete_org_secret(&self, org: &str, name: &str) -> Result<(), PlatformError> {
        self.delete_secret(ScopeKey::org(org), name)
    }

    async fn get_repo_public_key(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<PublicKey, PlatformError> {
        self.public_key(ScopeKey::repo(owner, repo))
    }

    async fn create_or_update_repo_secret(
        &self,
        owner: &str,
        repo: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), PlatformError> {
        self.put_secret(ScopeKey::repo(owner, repo), secret)
    }

    async fn get_repo_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<SecretMetadata, PlatformError> {
        self.get_secret(ScopeKey::repo(owner, repo), name)
    }

    async fn delete_repo_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<(), PlatformError> {
        self.delete_secret(ScopeKey::repo(owner, repo), name)
    }

    async fn get_env_public_key(
        &self,
        repository_id: u64,
        environment: &str,
    ) -> Result<PublicKey, PlatformError> {
        self.public_key(ScopeKey::env(repository_id, environment))
    }

    async fn create_or_update_env_secret(
        &self,
        repository_id: u64,
        environment: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), PlatformError> {
        self.put_secret(ScopeKey::env(repository_id, environment), secret)
    }

    async fn get_env_secret(
        &self,
        repository_id: u64,
        environment: &str,
        name: &str,
    ) -> Result<SecretMetadata, PlatformError> {
        self.get_secret(ScopeKey::env(repository_id, environment), name)
    }

    async fn delete_env_secret(
        &self,
        repository_id: u64,
        environment: &str,
        name: &str,
    ) -> Result<(), PlatformError> {
        self.delete_secret(ScopeKey::env(repository_id, environment), name)
    }
}
