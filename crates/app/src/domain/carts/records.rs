//! Cart Records

use std::collections::HashMap;

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{
        products::records::{ProductRecord, ProductUuid},
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Cart Item Record
#[derive(Debug, Clone)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub quantity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart line priced against the product's current price.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item: CartItemRecord,
    pub product: ProductRecord,
    pub subtotal: Decimal,
}

/// Cart as seen by its owner.
#[derive(Debug, Clone)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub lines: Vec<CartLine>,
    pub total: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Cart {
    /// Joins items with their products. Items whose product is no longer in
    /// `products` are left out, as is their contribution to the total.
    pub(crate) fn assemble(
        cart: CartRecord,
        items: Vec<CartItemRecord>,
        products: Vec<ProductRecord>,
    ) -> Self {
        let products: HashMap<ProductUuid, ProductRecord> = products
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let lines: Vec<CartLine> = items
            .into_iter()
            .filter_map(|item| {
                let product = products.get(&item.product_uuid)?.clone();
                let subtotal = product.price * Decimal::from(item.quantity);

                Some(CartLine {
                    item,
                    product,
                    subtotal,
                })
            })
            .collect();

        let total = lines.iter().map(|line| line.subtotal).sum();

        Self {
            uuid: cart.uuid,
            user_uuid: cart.user_uuid,
            lines,
            total,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        }
    }

    /// Whether the cart has any line with a live product.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
