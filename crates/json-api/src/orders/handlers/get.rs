//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use emporium_app::{
    domain::orders::records::{Order, OrderLine},
    money::format_amount,
};

use crate::{extensions::*, orders::into_status_error, products::get::ProductResponse, state::State};

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// The customer who placed the order
    pub user_uuid: Uuid,

    /// Lines whose product is still in the catalog
    pub items: Vec<OrderItemResponse>,

    /// Sum of every line subtotal at purchase time
    pub total_price: String,

    /// `pending`, `paid`, `shipping` or `delivered`
    pub status: String,

    pub checkout_session_id: Option<String>,

    /// The date and time the order was placed
    pub created_at: String,

    /// The date and time the order last changed
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid.into(),
            user_uuid: order.user_uuid.into(),
            items: order.lines.into_iter().map(OrderItemResponse::from).collect(),
            total_price: format_amount(order.total_price),
            status: order.status.as_str().to_string(),
            checkout_session_id: order.checkout_session_id,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,

    /// The product as it is in the catalog now
    pub product: ProductResponse,

    pub quantity: i32,

    /// Unit price when the order was placed
    pub price_at_purchase: String,

    pub subtotal: String,
}

impl From<OrderLine> for OrderItemResponse {
    fn from(line: OrderLine) -> Self {
        Self {
            uuid: line.item.uuid.into(),
            quantity: line.item.quantity,
            price_at_purchase: format_amount(line.item.price_at_purchase),
            subtotal: format_amount(line.item.subtotal),
            product: line.product.into(),
        }
    }
}

/// Get Order Handler
///
/// Returns one of the caller's orders.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let order = state
        .app
        .orders
        .get_order(user.uuid, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use emporium_app::domain::orders::{OrderStatus, OrdersServiceError, records::OrderUuid};

    use crate::{
        orders::tests::make_order,
        test_helpers::{Mocks, TEST_CUSTOMER_UUID, customer_service},
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        customer_service(mocks, Router::with_path("orders/{order}").get(handler))
    }

    #[tokio::test]
    async fn test_get_order_renders_lines() -> TestResult {
        let uuid = OrderUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_get_order()
            .once()
            .withf(move |user, order| *user == TEST_CUSTOMER_UUID && *order == uuid)
            .return_once(move |user, order| Ok(make_order(order, user, OrderStatus::Pending)));

        let order: OrderResponse = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(mocks))
            .await
            .take_json()
            .await?;

        assert_eq!(order.status, "pending");
        assert_eq!(order.total_price, "20.00");
        assert_eq!(
            order
                .items
                .first()
                .map(|item| (item.price_at_purchase.as_str(), item.quantity)),
            Some(("10.00", 2))
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_get_someone_elses_order_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
