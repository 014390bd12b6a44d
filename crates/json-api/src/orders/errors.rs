//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use emporium_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::CartEmpty => StatusError::bad_request().brief("Cart is empty"),
        OrdersServiceError::ProductNotFound(product) => {
            StatusError::not_found().brief(format!("Product {product} not found"))
        }
        OrdersServiceError::InsufficientStock(name) => {
            StatusError::bad_request().brief(format!("Insufficient stock for {name}"))
        }
        OrdersServiceError::TotalTooLarge => {
            StatusError::bad_request().brief("Order total is too large")
        }
        OrdersServiceError::InvalidTransition { from, to } => StatusError::conflict()
            .brief(format!("Cannot change order status from {from} to {to}")),
        OrdersServiceError::NotPending(status) => {
            StatusError::conflict().brief(format!("Order is already {status}"))
        }
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Amount(source) => {
            error!("order total cannot be charged: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Gateway(source) => {
            error!("failed to create checkout session: {source}");

            StatusError::internal_server_error().brief("Failed to create checkout")
        }
        OrdersServiceError::Sql(source) => {
            error!("failed to access orders: {source}");

            StatusError::internal_server_error()
        }
    }
}
