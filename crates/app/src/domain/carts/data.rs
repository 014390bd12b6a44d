//! Cart Data

use crate::domain::{
    carts::{errors::CartsServiceError, records::CartItemUuid},
    products::records::ProductUuid,
};

/// New Cart Item Data
///
/// Adding a product that already has a line in the cart increments that
/// line's quantity; `uuid` is only used when a new line is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: i32,
}

pub(crate) fn validate_quantity(quantity: i32) -> Result<(), CartsServiceError> {
    if quantity <= 0 {
        return Err(CartsServiceError::InvalidQuantity);
    }

    Ok(())
}

/// Quantity of a line after `added` units join the `existing` ones.
///
/// Refused when it would pass `stock` or overflow the quantity column.
pub(crate) fn merged_quantity(
    existing: i32,
    added: i32,
    stock: i32,
) -> Result<i32, CartsServiceError> {
    existing
        .checked_add(added)
        .filter(|quantity| *quantity <= stock)
        .ok_or(CartsServiceError::InsufficientStock)
}
