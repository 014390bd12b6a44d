//! Order Data

use rust_decimal::Decimal;

use crate::domain::{
    orders::{
        records::{OrderItemUuid, OrderUuid},
        status::OrderStatus,
    },
    products::records::ProductUuid,
    users::records::UserUuid,
};

/// Filters for the administrative order listing. `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub user_uuid: Option<UserUuid>,
}

/// What recording a completed payment did to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The order moved from `pending` to `paid`.
    Paid,

    /// The order was already `paid`; nothing changed.
    AlreadyPaid,

    /// The order has moved past `paid` and was left alone.
    Unchanged(OrderStatus),
}

/// An order line about to be stored, priced at the moment of purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewOrderItem {
    pub(crate) uuid: OrderItemUuid,
    pub(crate) order_uuid: OrderUuid,
    pub(crate) product_uuid: ProductUuid,
    pub(crate) quantity: i32,
    pub(crate) price_at_purchase: Decimal,
    pub(crate) subtotal: Decimal,
}
