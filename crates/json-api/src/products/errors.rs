//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use emporium_app::domain::products::ProductsServiceError;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Product already exists")
        }
        ProductsServiceError::Validation(reason) => {
            StatusError::unprocessable_entity().brief(reason)
        }
        ProductsServiceError::InvalidReference
        | ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidData => {
            StatusError::unprocessable_entity().brief("Invalid product payload")
        }
        ProductsServiceError::Sql(source) => {
            error!("failed to access products: {source}");

            StatusError::internal_server_error()
        }
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
    }
}
