//! auth::errors
//!
//! Authentication error types.
//!
//! # Design
//!
//! Error messages MUST NOT contain tokens. All error variants carry only
//! enough context (host, variable names) to tell the user what to fix.
//!
//! # Example
//!
//! ```
//! use ghsecrets::auth::AuthError;
//!
//! let err = AuthError::NotAuthenticated("github.com".to_string());
//! assert!(err.to_string().contains("github.com"));
//! assert!(!err.to_string().contains("ghp_")); // Never contains tokens
//! ```

use thiserror::Error;

/// Errors from authentication operations.
///
/// # Security
///
/// Error messages intentionally do not include token values.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token is available for the specified host.
    #[error("not authenticated for host '{0}'. Set GH_TOKEN or pass --token.")]
    NotAuthenticated(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = AuthError::NotAuthenticated("github.com".to_string());
        let msg = err.to_string();
        assert!(msg.contains("github.com"));
        assert!(msg.contains("GH_TOKEN"));
    }

    #[test]
    fn error_messages_never_contain_token_patterns() {
        let errors = vec![
            AuthError::NotAuthenticated("github.com".to_string()),
            AuthError::NotAuthenticated("ghe.example.com".to_string()),
        ];

        for err in errors {
            let msg = err.to_string();
            assert!(
                !msg.contains("ghp_"),
                "Error message contains token pattern: {}",
                msg
            );
        }
    }
}
