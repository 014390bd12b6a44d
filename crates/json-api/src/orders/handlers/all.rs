//! All Orders Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};
use uuid::Uuid;

use emporium_app::{
    domain::orders::{OrderStatus, data::OrderFilter},
    pagination::Pagination,
};

use crate::{
    extensions::*,
    orders::{index::OrdersResponse, into_status_error},
    state::State,
};

/// All Orders Handler
///
/// Returns every order, newest first, optionally filtered by status and
/// customer.
#[endpoint(
    tags("orders"),
    summary = "List All Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Orders"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
        (
            status_code = StatusCode::UNPROCESSABLE_ENTITY,
            description = "Invalid filter or pagination"
        ),
    ),
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    user_id: QueryParam<Uuid, false>,
    skip: QueryParam<i64, false>,
    limit: QueryParam<i64, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let page = Pagination::new(skip.into_inner(), limit.into_inner()).or_422("invalid pagination")?;

    let filter = OrderFilter {
        status: status
            .into_inner()
            .map(|status| status.parse::<OrderStatus>())
            .transpose()
            .or_422("invalid status filter")?,
        user_uuid: user_id.into_inner().map(Into::into),
    };

    let orders = state
        .app
        .orders
        .list_all_orders(filter, page)
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

    use emporium_app::domain::orders::records::OrderUuid;

    use crate::{
        auth::middleware,
        orders::tests::make_order,
        test_helpers::{Mocks, TEST_CUSTOMER_UUID, admin_service, customer_service},
    };

    use super::*;

    fn route() -> Router {
        Router::with_path("orders/all").hoop(middleware::admin).get(handler)
    }

    #[tokio::test]
    async fn test_all_orders_forwards_filters() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_list_all_orders()
            .once()
            .withf(|filter, page| {
                *filter
                    == OrderFilter {
                        status: Some(OrderStatus::Paid),
                        user_uuid: Some(TEST_CUSTOMER_UUID),
                    }
                    && page.skip() == 10
                    && page.limit() == 5
            })
            .return_once(|_, _| {
                Ok(vec![make_order(
                    OrderUuid::new(),
                    TEST_CUSTOMER_UUID,
                    OrderStatus::Paid,
                )])
            });

        let url = format!(
            "http://example.com/orders/all?status=paid&user_id={TEST_CUSTOMER_UUID}&skip=10&limit=5"
        );

        let response: OrdersResponse = TestClient::get(url)
            .send(&admin_service(mocks, route()))
            .await
            .take_json()
            .await?;

        assert_eq!(response.orders.len(), 1, "expected the single paid order");

        Ok(())
    }

    #[tokio::test]
    async fn test_all_orders_without_filters_uses_defaults() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_list_all_orders()
            .once()
            .withf(|filter, page| {
                *filter == OrderFilter::default() && *page == Pagination::default()
            })
            .return_once(|_, _| Ok(vec![]));

        let res = TestClient::get("http://example.com/orders/all")
            .send(&admin_service(mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_status_filter_returns_422() -> TestResult {
        let res = TestClient::get("http://example.com/orders/all?status=lost")
            .send(&admin_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_cannot_list_all_orders() -> TestResult {
        let res = TestClient::get("http://example.com/orders/all")
            .send(&customer_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
