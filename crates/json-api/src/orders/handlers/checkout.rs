//! Order Checkout Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use emporium_app::{domain::orders::OrdersServiceError, payments::CheckoutSession};

use crate::{
    extensions::*, observability::record_checkout, orders::into_status_error, state::State,
};

/// Checkout Session Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    /// Payment processor session identifier
    pub session_id: String,

    /// Where to send the customer to pay
    pub checkout_url: String,
}

impl From<CheckoutSession> for CheckoutResponse {
    fn from(session: CheckoutSession) -> Self {
        Self {
            session_id: session.session_id,
            checkout_url: session.checkout_url,
        }
    }
}

/// Order Checkout Handler
///
/// Opens a hosted payment page for one of the caller's pending orders.
#[endpoint(
    tags("orders"),
    summary = "Start Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Checkout session created"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order is not pending"),
        (
            status_code = StatusCode::INTERNAL_SERVER_ERROR,
            description = "Failed to create checkout"
        ),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let session = state
        .app
        .orders
        .start_checkout(user.uuid, order.into_inner().into())
        .await
        .map_err(|error| {
            if matches!(error, OrdersServiceError::Gateway(_)) {
                record_checkout("failed");
            }

            into_status_error(error)
        })?;

    record_checkout("started");

    Ok(Json(session.into()))
}
