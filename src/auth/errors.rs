//! # Auth Errors
//!
//! Error types for authentication and credential handling.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Bad email/password or API key (generic - don't leak which)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// API key past its TTL
    #[error("API key expired")]
    ApiKeyExpired,

    /// Email already registered
    #[error("Email already registered")]
    EmailAlreadyExists,

    /// Password does not meet requirements
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials => 401,
            AuthError::ApiKeyExpired => 401,

            AuthError::EmailAlreadyExists => 400,
            AuthError::WeakPassword(_) => 400,

            AuthError::HashingFailed => 500,
            AuthError::Storage(_) => 500,
        }
    }
}

impl From<crate::store::StoreError> for AuthError {
    fn from(err: crate::store::StoreError) -> Self {
        AuthError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::ApiKeyExpired.status_code(), 401);
        assert_eq!(AuthError::EmailAlreadyExists.status_code(), 400);
        assert_eq!(AuthError::WeakPassword("short".to_string()).status_code(), 400);
        assert_eq!(AuthError::HashingFailed.status_code(), 500);
    }

    #[test]
    fn test_error_messages_do_not_leak_info() {
        let err = AuthError::InvalidCredentials;
        assert!(!err.to_string().contains("password"));
        assert!(!err.to_string().contains("email"));
    }
}
