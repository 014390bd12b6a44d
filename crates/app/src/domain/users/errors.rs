//! Users service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{
    auth::PasswordHashError,
    database::{Failure, classify},
};

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("email address already in use")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("invalid data: {0}")]
    InvalidData(&'static str),

    #[error("current password is incorrect")]
    IncorrectPassword,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        match classify(&error) {
            Failure::NoRows => Self::NotFound,
            Failure::Duplicate => Self::AlreadyExists,
            Failure::MissingValue | Failure::ConstraintViolated => {
                Self::InvalidData("user violates a storage constraint")
            }
            Failure::DanglingReference | Failure::Other => Self::Sql(error),
        }
    }
}
