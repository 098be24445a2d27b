//! CLI error types.

use thiserror::Error;

use crate::auth::AuthError;
use crate::mail::MailError;
use crate::store::StoreError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("mail error: {0}")]
    Mail(#[from] MailError),

    #[error("{0}")]
    Invalid(String),
}
