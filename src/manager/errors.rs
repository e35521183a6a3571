//! manager::errors
//!
//! Error type for secret manager operations.
//!
//! # Design
//!
//! Every failure belongs to one of four kinds. Programmatic callers test
//! the kind with [`ManagerError::kind`] instead of parsing messages:
//!
//! - `InvalidInput`: the configuration is self-inconsistent; nothing was sent
//! - `Unable`: a remote call succeeded but returned unusable data
//! - `Platform`: the platform client failed; the error is carried unchanged
//! - `Encryption`: the value could not be sealed locally
//!
//! # Example
//!
//! ```
//! use ghsecrets::manager::{ErrorKind, ManagerError};
//!
//! let err = ManagerError::InvalidInput("owner must not be empty".into());
//! assert_eq!(err.kind(), ErrorKind::InvalidInput);
//! assert!(err.to_string().contains("owner"));
//! ```

use thiserror::Error;

use super::crypto::SealError;
use crate::platform::PlatformError;

/// Errors from secret manager operations.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Configuration is self-inconsistent.
    #[error("input is invalid: {0}")]
    InvalidInput(String),

    /// The platform answered, but not with anything usable.
    #[error("unable to perform requested action: {0}")]
    Unable(String),

    /// Error from the platform client, passed through unchanged.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Local sealed-box encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(#[from] SealError),
}

/// The kind of a [`ManagerError`], for identity-style comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`ManagerError::InvalidInput`]
    InvalidInput,
    /// See [`ManagerError::Unable`]
    Unable,
    /// See [`ManagerError::Platform`]
    Platform,
    /// See [`ManagerError::Encryption`]
    Encryption,
}

impl ManagerError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ManagerError::InvalidInput(_) => ErrorKind::InvalidInput,
            ManagerError::Unable(_) => ErrorKind::Unable,
            ManagerError::Platform(_) => ErrorKind::Platform,
            ManagerError::Encryption(_) => ErrorKind::Encryption,
        }
    }

    /// The underlying platform error, if this is a platform failure.
    pub fn platform_error(&self) -> Option<&PlatformError> {
        match self {
            ManagerError::Platform(e) => Some(e),
            _ => None,
        }
    }
}
