//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use emporium_app::{
    domain::carts::records::{Cart, CartLine},
    money::format_amount,
};

use crate::{carts::into_status_error, extensions::*, products::get::ProductResponse, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    pub user_uuid: Uuid,

    /// The items in the cart
    pub items: Vec<CartItemResponse>,

    /// Sum of the line subtotals at current prices
    pub total: String,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        CartResponse {
            uuid: cart.uuid.into(),
            user_uuid: cart.user_uuid.into(),
            items: cart.lines.into_iter().map(CartItemResponse::from).collect(),
            total: format_amount(cart.total),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    pub product: ProductResponse,

    pub quantity: i32,

    /// Current unit price times quantity
    pub subtotal: String,

    /// The date and time the item was first added
    pub added_at: String,
}

impl From<CartLine> for CartItemResponse {
    fn from(line: CartLine) -> Self {
        Self {
            uuid: line.item.uuid.into(),
            quantity: line.item.quantity,
            subtotal: format_amount(line.subtotal),
            added_at: line.item.created_at.to_string(),
            product: line.product.into(),
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's cart, creating an empty one on first use.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use emporium_app::domain::products::records::ProductUuid;

    use crate::{
        carts::tests::make_cart,
        test_helpers::{Mocks, TEST_CUSTOMER_UUID, customer_service},
    };

    use super::*;

    #[tokio::test]
    async fn test_get_cart_renders_lines_and_total() -> TestResult {
        let product = ProductUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_get_cart()
            .once()
            .withf(|user| *user == TEST_CUSTOMER_UUID)
            .return_once(move |_| Ok(make_cart(vec![(product, "10.00", 2)])));

        let cart: CartResponse = TestClient::get("http://example.com/cart")
            .send(&customer_service(mocks, Router::with_path("cart").get(handler)))
            .await
            .take_json()
            .await?;

        assert_eq!(cart.total, "20.00");
        assert_eq!(cart.items.len(), 1, "expected one line");
        assert_eq!(
            cart.items.first().map(|item| (item.product.uuid, item.subtotal.as_str())),
            Some((product.into_uuid(), "20.00"))
        );

        Ok(())
    }
}
