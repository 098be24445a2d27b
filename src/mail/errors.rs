//! # Mail Errors
//!
//! Error types for the email module.

use thiserror::Error;

/// Result type for mail operations
pub type MailResult<T> = Result<T, MailError>;

/// Email errors
#[derive(Debug, Error)]
pub enum MailError {
    /// Recipient or sender address failed to parse
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// Message could not be built
    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// SMTP delivery failed
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
