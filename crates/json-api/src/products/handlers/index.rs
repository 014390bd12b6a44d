//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use emporium_app::pagination::Pagination;

use crate::{
    extensions::*,
    products::{get::ProductResponse, into_status_error},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products
    pub products: Vec<ProductResponse>,
}

/// Product Index Handler
///
/// Returns a page of products, oldest first.
#[endpoint(
    tags("products"),
    summary = "List Products",
    responses(
        (status_code = StatusCode::OK, description = "Products"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid pagination"),
    ),
)]
pub(crate) async fn handler(
    skip: QueryParam<i64, false>,
    limit: QueryParam<i64, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let page = Pagination::new(skip.into_inner(), limit.into_inner()).or_422("invalid pagination")?;

    let products = state
        .app
        .products
        .list_products(page)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use emporium_app::domain::products::records::ProductUuid;

    use crate::test_helpers::{Mocks, anonymous_service, make_product};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        anonymous_service(mocks, Router::with_path("products").get(handler))
    }

    #[tokio::test]
    async fn test_index_applies_default_page() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_products()
            .once()
            .withf(|page| *page == Pagination::default())
            .return_once(|_| Ok(vec![]));

        let response: ProductsResponse = TestClient::get("http://example.com/products")
            .send(&make_service(mocks))
            .await
            .take_json()
            .await?;

        assert!(response.products.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_index_returns_products_in_order() -> TestResult {
        let uuid_a = ProductUuid::new();
        let uuid_b = ProductUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_products()
            .once()
            .withf(|page| page.skip() == 5 && page.limit() == 2)
            .return_once(move |_| {
                Ok(vec![
                    make_product(uuid_a, "1.00", 1),
                    make_product(uuid_b, "2.00", 2),
                ])
            });

        let response: ProductsResponse =
            TestClient::get("http://example.com/products?skip=5&limit=2")
                .send(&make_service(mocks))
                .await
                .take_json()
                .await?;

        let uuids: Vec<_> = response.products.iter().map(|product| product.uuid).collect();

        assert_eq!(uuids, vec![uuid_a.into_uuid(), uuid_b.into_uuid()]);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_limit_out_of_range_returns_422() -> TestResult {
        let res = TestClient::get("http://example.com/products?limit=101")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_negative_skip_returns_422() -> TestResult {
        let res = TestClient::get("http://example.com/products?skip=-1")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
