//! Errors

use salvo::http::StatusError;
use tracing::error;

use emporium_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::ItemNotFound => StatusError::not_found().brief("Cart item not found"),
        CartsServiceError::ProductNotFound | CartsServiceError::InvalidReference => {
            StatusError::not_found().brief("Product not found")
        }
        CartsServiceError::InsufficientStock => {
            StatusError::bad_request().brief("Insufficient stock")
        }
        CartsServiceError::InvalidQuantity => {
            StatusError::unprocessable_entity().brief("Quantity must be greater than zero")
        }
        CartsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Cart item already exists")
        }
        CartsServiceError::MissingRequiredData | CartsServiceError::InvalidData => {
            StatusError::unprocessable_entity().brief("Invalid cart payload")
        }
        CartsServiceError::Sql(source) => {
            error!("failed to access cart: {source}");

            StatusError::internal_server_error()
        }
    }
}
