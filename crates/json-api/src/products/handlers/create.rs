//! Create Product Handler

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use emporium_app::domain::products::{data::NewProduct, records::ProductUuid};

use crate::{
    extensions::*,
    products::{get::ProductResponse, into_status_error},
    state::State,
};

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Unit price, positive with at most two fractional digits
    #[salvo(schema(value_type = String))]
    pub price: Decimal,

    #[serde(default)]
    pub stock_quantity: i32,

    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        NewProduct {
            uuid: ProductUuid::new(),
            name: request.name,
            description: request.description,
            price: request.price,
            stock_quantity: request.stock_quantity,
            image_url: request.image_url,
        }
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid product"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .create_product(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use emporium_app::domain::products::ProductsServiceError;

    use crate::{
        auth::middleware,
        test_helpers::{Mocks, admin_service, customer_service, make_product},
    };

    use super::*;

    fn route() -> Router {
        Router::with_path("products").hoop(middleware::admin).post(handler)
    }

    #[tokio::test]
    async fn test_create_product_success() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_create_product()
            .once()
            .withf(|new| {
                new.name == "Teapot"
                    && Decimal::from_str("19.99").is_ok_and(|price| new.price == price)
                    && new.stock_quantity == 5
            })
            .return_once(|new| Ok(make_product(new.uuid, "19.99", 5)));

        let mut res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Teapot", "price": "19.99", "stock_quantity": 5 }))
            .send(&admin_service(mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: ProductResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(location, Some(format!("/products/{}", body.uuid).as_str()));
        assert_eq!(body.price, "19.99");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_as_customer_returns_403() -> TestResult {
        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Teapot", "price": "19.99" }))
            .send(&customer_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_invalid_price_returns_422() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_create_product()
            .once()
            .return_once(|_| {
                Err(ProductsServiceError::Validation(
                    "price must be positive with at most two decimal places",
                ))
            });

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Teapot", "price": "0.001" }))
            .send(&admin_service(mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
