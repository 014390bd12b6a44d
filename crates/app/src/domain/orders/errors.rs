//! Orders service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{
    database::{Failure, classify},
    domain::{orders::status::OrderStatus, products::records::ProductUuid},
    money::MoneyError,
    payments::PaymentError,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("cart is empty")]
    CartEmpty,

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("insufficient stock for {0}")]
    InsufficientStock(String),

    #[error("order total exceeds the largest amount that can be recorded")]
    TotalTooLarge,

    #[error("cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("order is already {0}")]
    NotPending(OrderStatus),

    #[error("order total cannot be charged")]
    Amount(#[from] MoneyError),

    #[error("payment gateway error")]
    Gateway(#[source] PaymentError),

    #[error("order already exists")]
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

impl From<Error> for OrdersServiceError {
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
