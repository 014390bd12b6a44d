//! Carts service errors.

use sqlx::Error;
use thiserror::Error;

use crate::database::{Failure, classify};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart not found")]
    NotFound,

    #[error("cart item not found")]
    ItemNotFound,

    #[error("product not found")]
    ProductNotFound,

    #[error("insufficient stock")]
    InsufficientStock,

    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("cart item already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
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
