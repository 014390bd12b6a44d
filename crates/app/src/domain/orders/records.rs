//! Order Records

use std::collections::HashMap;

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{
        orders::status::OrderStatus,
        products::records::{ProductRecord, ProductUuid},
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub checkout_session_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Item Record
///
/// Price and subtotal are fixed when the order is placed.
#[derive(Debug, Clone)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub quantity: i32,
    pub price_at_purchase: Decimal,
    pub subtotal: Decimal,
    pub created_at: Timestamp,
}

/// An order line together with the product it refers to.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub item: OrderItemRecord,
    pub product: ProductRecord,
}

/// An order with its renderable lines.
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub checkout_session_id: Option<String>,
    pub lines: Vec<OrderLine>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Pairs `items`, which must all belong to `order`, with live products. Items whose product has
    /// since been deleted are not rendered; the total is left as stored.
    pub(crate) fn assemble(
        order: OrderRecord,
        items: Vec<OrderItemRecord>,
        products: &HashMap<ProductUuid, ProductRecord>,
    ) -> Self {
        let lines = items
            .into_iter()
            .filter_map(|item| {
                let product = products.get(&item.product_uuid)?.clone();

                Some(OrderLine { item, product })
            })
            .collect();

        Self {
            uuid: order.uuid,
            user_uuid: order.user_uuid,
            total_price: order.total_price,
            status: order.status,
            checkout_session_id: order.checkout_session_id,
            lines,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> ProductRecord {
        ProductRecord {
            uuid: ProductUuid::new(),
            name: "Kettle".to_string(),
            description: None,
            price: Decimal::new(2_000, 2),
            stock_quantity: 1,
            image_url: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }

    fn order() -> OrderRecord {
        OrderRecord {
            uuid: OrderUuid::new(),
            user_uuid: UserUuid::new(),
            total_price: Decimal::new(6_000, 2),
            status: OrderStatus::Pending,
            checkout_session_id: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn item(order: OrderUuid, product: ProductUuid) -> OrderItemRecord {
        OrderItemRecord {
            uuid: OrderItemUuid::new(),
            order_uuid: order,
            product_uuid: product,
            quantity: 1,
            price_at_purchase: Decimal::new(2_000, 2),
            subtotal: Decimal::new(2_000, 2),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn lines_for_deleted_products_are_not_rendered() {
        let order = order();
        let kettle = product();

        let items = vec![item(order.uuid, kettle.uuid), item(order.uuid, ProductUuid::new())];
        let products = HashMap::from([(kettle.uuid, kettle)]);

        let assembled = Order::assemble(order, items, &products);

        assert_eq!(assembled.lines.len(), 1, "orphaned line should be omitted");
        assert_eq!(
            assembled.total_price,
            Decimal::new(6_000, 2),
            "stored total is not recomputed"
        );
    }
}
