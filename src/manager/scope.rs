//! manager::scope
//!
//! Manager configuration and the scope it selects.
//!
//! # Scope Selection
//!
//! The scope is derived from which fields are set, never stored:
//!
//! | repository | environment | scope        |
//! |------------|-------------|--------------|
//! | empty      | empty       | Organization |
//! | set        | empty       | Repository   |
//! | set        | set         | Environment  |
//! | empty      | set         | invalid      |
//!
//! Empty strings count as unset.

use crate::platform::Visibility;

use super::errors::ManagerError;

/// The breadth at which a secret is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Organization-wide secret
    Organization,
    /// Repository-wide secret
    Repository,
    /// Secret tied to one deployment environment of a repository
    Environment,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Organization => write!(f, "organization"),
            Scope::Repository => write!(f, "repository"),
            Scope::Environment => write!(f, "environment"),
        }
    }
}

/// Which secrets a manager operates on.
///
/// # Example
///
/// ```
/// use ghsecrets::manager::{ManagerConfig, Scope};
///
/// let config = ManagerConfig::new("octocat")
///     .with_repository("hello-world")
///     .with_environment("production");
/// assert_eq!(config.scope().unwrap(), Scope::Environment);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Organization or user that owns the secrets (required)
    pub owner: String,
    /// Repository name; unset means organization secrets
    pub repository: Option<String>,
    /// Environment name; requires a repository
    pub environment: Option<String>,
    /// Visibility applied to organization secret writes
    pub visibility: Option<Visibility>,
}

impl ManagerConfig {
    /// Create a configuration for organization secrets of `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            ..Self::default()
        }
    }

    /// Target a repository.
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Target an environment of the repository.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Set the visibility for organization secrets.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Repository name, if set and non-empty.
    pub fn repo(&self) -> Option<&str> {
        self.repository.as_deref().filter(|s| !s.is_empty())
    }

    /// Environment name, if set and non-empty.
    pub fn env(&self) -> Option<&str> {
        self.environment.as_deref().filter(|s| !s.is_empty())
    }

    /// Check the configuration is self-consistent.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::InvalidInput`] if the owner is empty or an
    /// environment is set without a repository.
    pub fn validate(&self) -> Result<(), ManagerError> {
        if self.owner.is_empty() {
            return Err(ManagerError::InvalidInput(
                "owner must not be empty".into(),
            ));
        }
        if self.repo().is_none() && self.env().is_some() {
            return Err(ManagerError::InvalidInput(
                "environment requires a repository".into(),
            ));
        }
        Ok(())
    }

    /// Validate and select the scope.
    pub fn scope(&self) -> Result<Scope, ManagerError> {
        self.validate()?;
        Ok(match (self.repo(), self.env()) {
            (None, _) => Scope::Organization,
            (Some(_), None) => Scope::Repository,
            (Some(_), Some(_)) => Scope::Environment,
        })
    }
}
