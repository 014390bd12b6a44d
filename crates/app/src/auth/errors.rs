//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::auth::{AccessTokenError, PasswordHashError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Bearer token is unknown, expired, revoked, or does not verify.
    #[error("token not found")]
    NotFound,

    /// Login email/password pair does not match a user.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Authenticated, but not allowed to perform the operation.
    #[error("admin access required")]
    Forbidden,

    #[error("token lifetime overflows the clock")]
    Expiry(#[source] jiff::Error),

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("token processing error")]
    Token(#[source] AccessTokenError),

    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<AccessTokenError> for AuthServiceError {
    fn from(error: AccessTokenError) -> Self {
        Self::Token(error)
    }
}
