//! Products service errors.

use sqlx::Error;
use thiserror::Error;

use crate::database::{Failure, classify};

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product already exists")]
    AlreadyExists,

    #[error("product not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("invalid product: {0}")]
    Validation(&'static str),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ProductsServiceError {
    fn from(error: Error) -> Self {
        match classify(&error) {
            Failure::NoRows => Self::NotFound,
            Failure::Duplicate => Self::AlreadyExists,
            Failure::DanglingReference => Self::InvalidReference,
            Failure::MissingValue => Self::MissingRequiredData,
            Failure::ConstraintViolated => Self::InvalidData,
            Failure::Other => Self::Sql(error),
        }
    }
}
