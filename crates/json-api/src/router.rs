//! App Router

use salvo::Router;

use crate::{
    auth::{self, middleware},
    carts, healthcheck,
    observability::metrics_handler,
    orders, products, users, webhooks,
};

pub fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(
            Router::with_path("auth")
                .push(Router::with_path("register").post(auth::register::handler))
                .push(Router::with_path("login").post(auth::login::handler)),
        )
        .push(Router::with_path("webhooks/stripe").post(webhooks::stripe::handler))
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(
            Router::new()
                .hoop(middleware::handler)
                .push(admin_router())
                .push(user_router()),
        )
}

fn user_router() -> Router {
    Router::new()
        .push(
            Router::with_path("users/me")
                .get(users::me::handler)
                .patch(users::update::handler)
                .push(Router::with_path("password").put(users::password::handler)),
        )
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .post(carts::items::create::handler)
                .delete(carts::delete::handler)
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .push(
                            Router::with_path("{item}")
                                .patch(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("{order}/checkout").post(orders::checkout::handler))
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
}

fn admin_router() -> Router {
    Router::new()
        .hoop(middleware::admin)
        .push(
            Router::with_path("products")
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .patch(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .push(Router::with_path("all").get(orders::all::handler))
                .push(Router::with_path("{order}").patch(orders::update::handler)),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        http::header::AUTHORIZATION,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use emporium_app::{
        auth::AuthenticatedUser,
        domain::{
            orders::{OrderStatus, records::OrderUuid},
            users::records::UserRole,
        },
    };

    use crate::{
        orders::tests::make_order,
        test_helpers::{Mocks, TEST_CUSTOMER_UUID},
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(mocks.into_state()))
                .push(app_router()),
        )
    }

    fn as_customer(mocks: &mut Mocks) {
        mocks
            .auth
            .expect_authenticate_bearer()
            .returning(|_| {
                Ok(AuthenticatedUser {
                    uuid: TEST_CUSTOMER_UUID,
                    role: UserRole::Customer,
                })
            });
    }

    #[tokio::test]
    async fn test_healthcheck_is_public() -> TestResult {
        let res = TestClient::get("http://example.com/healthcheck")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_is_public() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_products()
            .once()
            .return_once(|_| Ok(vec![]));

        let res = TestClient::get("http://example.com/products")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_requires_credentials() -> TestResult {
        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert!(
            res.take_string()
                .await?
                .contains("Could not validate credentials"),
            "expected the credentials message"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_product_writes_require_admin() -> TestResult {
        let mut mocks = Mocks::default();

        as_customer(&mut mocks);

        let res = TestClient::post("http://example.com/products")
            .add_header(AUTHORIZATION, "Bearer token", true)
            .json(&serde_json::json!({ "name": "Teapot", "price": "10.00", "stock_quantity": 1 }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_all_orders_is_not_captured_by_order_lookup() -> TestResult {
        let mut mocks = Mocks::default();

        as_customer(&mut mocks);

        let res = TestClient::get("http://example.com/orders/all")
            .add_header(AUTHORIZATION, "Bearer token", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_reads_own_order() -> TestResult {
        let uuid = OrderUuid::new();

        let mut mocks = Mocks::default();

        as_customer(&mut mocks);

        mocks
            .orders
            .expect_get_order()
            .once()
            .withf(move |user, order| *user == TEST_CUSTOMER_UUID && *order == uuid)
            .return_once(|user, order| Ok(make_order(order, user, OrderStatus::Pending)));

        let res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .add_header(AUTHORIZATION, "Bearer token", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
