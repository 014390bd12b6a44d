//! Order Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    orders::{get::OrderResponse, into_status_error},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// Orders, newest first
    pub orders: Vec<OrderResponse>,
}

/// Order Index Handler
///
/// Returns the caller's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let orders = state
        .app
        .orders
        .list_orders(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use emporium_app::domain::orders::{OrderStatus, records::OrderUuid};

    use crate::{
        orders::tests::make_order,
        test_helpers::{Mocks, TEST_CUSTOMER_UUID, customer_service},
    };

    use super::*;

    #[tokio::test]
    async fn test_index_lists_callers_orders() -> TestResult {
        let newest = OrderUuid::new();
        let oldest = OrderUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_list_orders()
            .once()
            .withf(|user| *user == TEST_CUSTOMER_UUID)
            .return_once(move |user| {
                Ok(vec![
                    make_order(newest, user, OrderStatus::Paid),
                    make_order(oldest, user, OrderStatus::Pending),
                ])
            });

        let response: OrdersResponse = TestClient::get("http://example.com/orders")
            .send(&customer_service(
                mocks,
                Router::with_path("orders").get(handler),
            ))
            .await
            .take_json()
            .await?;

        let uuids: Vec<_> = response.orders.iter().map(|order| order.uuid).collect();

        assert_eq!(uuids, vec![newest.into_uuid(), oldest.into_uuid()]);

        Ok(())
    }
}
