//! Stripe Webhook Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use emporium_app::{
    domain::orders::{OrdersServiceError, data::PaymentOutcome, records::OrderUuid},
    payments::{PaymentError, PaymentEvent},
};

use crate::{extensions::*, observability::record_webhook, state::State};

const SIGNATURE_HEADER: &str = "stripe-signature";

/// Webhook Acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookResponse {
    /// `success`, `ignored` or `noop`
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WebhookResponse {
    fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: None,
        }
    }

    fn ignored() -> Self {
        Self {
            status: "ignored".to_string(),
            message: None,
        }
    }

    fn noop(message: impl Into<String>) -> Self {
        Self {
            status: "noop".to_string(),
            message: Some(message.into()),
        }
    }
}

fn into_status_error(error: PaymentError) -> StatusError {
    match error {
        PaymentError::InvalidSignature => StatusError::bad_request().brief("Invalid signature"),
        PaymentError::InvalidPayload(source) => {
            warn!(error = %source, "rejected webhook payload");

            StatusError::bad_request().brief("Invalid payload")
        }
        error => {
            error!(%error, "failed to read webhook event");

            StatusError::internal_server_error()
        }
    }
}

/// Stripe Webhook Handler
///
/// Records completed checkouts. Deliveries we cannot act upon are still
/// acknowledged so the processor stops retrying them.
#[endpoint(
    tags("webhooks"),
    summary = "Stripe Webhook",
    responses(
        (status_code = StatusCode::OK, description = "Event acknowledged"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid signature or payload"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<WebhookResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let signature = req.header::<String>(SIGNATURE_HEADER);

    let payload = req
        .payload()
        .await
        .map_err(|_error| StatusError::bad_request().brief("Invalid payload"))?;

    let event = state
        .app
        .payments
        .parse_event(payload, signature)
        .map_err(|error| {
            record_webhook("rejected");

            into_status_error(error)
        })?;

    let response = apply(state, event).await?;

    record_webhook(&response.status);

    Ok(Json(response))
}

async fn apply(state: &State, event: PaymentEvent) -> Result<WebhookResponse, StatusError> {
    let PaymentEvent::CheckoutCompleted {
        session_id,
        order_ref,
    } = event
    else {
        return Ok(WebhookResponse::ignored());
    };

    let Some(order) = order_ref.and_then(|order_ref| order_ref.parse::<OrderUuid>().ok()) else {
        warn!(session = %session_id, "completed checkout without a usable order reference");

        return Ok(WebhookResponse::noop("No order_id in metadata"));
    };

    match state.app.orders.mark_paid(order).await {
        Ok(PaymentOutcome::Paid | PaymentOutcome::AlreadyPaid) => {
            info!(%order, session = %session_id, "checkout completed");

            Ok(WebhookResponse::success())
        }
        Ok(PaymentOutcome::Unchanged(status)) => {
            Ok(WebhookResponse::noop(format!("Order is already {status}")))
        }
        Err(OrdersServiceError::NotFound) => {
            warn!(%order, session = %session_id, "completed checkout for unknown order");

            Ok(WebhookResponse::noop("Order not found"))
        }
        Err(error) => {
            error!(%error, %order, "failed to record payment");

            Err(StatusError::internal_server_error())
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use emporium_app::domain::orders::OrderStatus;

    use crate::test_helpers::{Mocks, anonymous_service};

    use super::*;

    const BODY: &str = r#"{"type":"checkout.session.completed"}"#;

    fn make_service(mocks: Mocks) -> Service {
        anonymous_service(mocks, Router::with_path("webhooks/stripe").post(handler))
    }

    fn completed(order_ref: Option<String>) -> PaymentEvent {
        PaymentEvent::CheckoutCompleted {
            session_id: "cs_test_123".to_string(),
            order_ref,
        }
    }

    async fn deliver(mocks: Mocks) -> TestResult<WebhookResponse> {
        let response = TestClient::post("http://example.com/webhooks/stripe")
            .add_header(SIGNATURE_HEADER, "t=1,v1=abc", true)
            .raw_json(BODY)
            .send(&make_service(mocks))
            .await
            .take_json()
            .await?;

        Ok(response)
    }

    #[tokio::test]
    async fn test_completed_checkout_marks_order_paid() -> TestResult {
        let order = OrderUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_parse_event()
            .once()
            .withf(|payload, signature| {
                payload.to_vec() == BODY.as_bytes() && signature.as_deref() == Some("t=1,v1=abc")
            })
            .return_once(move |_, _| Ok(completed(Some(order.to_string()))));

        mocks
            .orders
            .expect_mark_paid()
            .once()
            .withf(move |uuid| *uuid == order)
            .return_once(|_| Ok(PaymentOutcome::Paid));

        let response = deliver(mocks).await?;

        assert_eq!(response.status, "success");
        assert_eq!(response.message, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_repeat_delivery_is_still_success() -> TestResult {
        let order = OrderUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_parse_event()
            .once()
            .return_once(move |_, _| Ok(completed(Some(order.to_string()))));

        mocks
            .orders
            .expect_mark_paid()
            .once()
            .return_once(|_| Ok(PaymentOutcome::AlreadyPaid));

        assert_eq!(deliver(mocks).await?.status, "success");

        Ok(())
    }

    #[tokio::test]
    async fn test_shipped_order_is_left_alone() -> TestResult {
        let order = OrderUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_parse_event()
            .once()
            .return_once(move |_, _| Ok(completed(Some(order.to_string()))));

        mocks
            .orders
            .expect_mark_paid()
            .once()
            .return_once(|_| Ok(PaymentOutcome::Unchanged(OrderStatus::Shipping)));

        let response = deliver(mocks).await?;

        assert_eq!(response.status, "noop");
        assert_eq!(
            response.message.as_deref(),
            Some("Order is already shipping")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_other_events_are_ignored() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.payments.expect_parse_event().once().return_once(|_, _| {
            Ok(PaymentEvent::Other {
                kind: "payment_intent.created".to_string(),
            })
        });

        assert_eq!(deliver(mocks).await?.status, "ignored");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_order_reference_is_a_noop() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_parse_event()
            .once()
            .return_once(|_, _| Ok(completed(None)));

        let response = deliver(mocks).await?;

        assert_eq!(response.status, "noop");
        assert_eq!(response.message.as_deref(), Some("No order_id in metadata"));

        Ok(())
    }

    #[tokio::test]
    async fn test_garbled_order_reference_is_a_noop() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_parse_event()
            .once()
            .return_once(|_, _| Ok(completed(Some("not-a-uuid".to_string()))));

        assert_eq!(deliver(mocks).await?.status, "noop");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_order_is_a_noop() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_parse_event()
            .once()
            .return_once(|_, _| Ok(completed(Some(OrderUuid::new().to_string()))));

        mocks
            .orders
            .expect_mark_paid()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));

        let response = deliver(mocks).await?;

        assert_eq!(response.status, "noop");
        assert_eq!(response.message.as_deref(), Some("Order not found"));

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_signature_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_parse_event()
            .once()
            .return_once(|_, _| Err(PaymentError::InvalidSignature));

        let mut res = TestClient::post("http://example.com/webhooks/stripe")
            .raw_json(BODY)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(
            res.take_string().await?.contains("Invalid signature"),
            "error should name the signature"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_payload_returns_400() -> TestResult {
        let source = serde_json::from_str::<serde_json::Value>("{")
            .err()
            .ok_or("expected a parse error")?;

        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_parse_event()
            .once()
            .return_once(move |_, _| Err(PaymentError::InvalidPayload(source)));

        let res = TestClient::post("http://example.com/webhooks/stripe")
            .raw_json("{")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
