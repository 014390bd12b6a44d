//! Stripe hosted checkout.

use std::collections::HashMap;

use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    payments::{
        errors::PaymentError,
        gateway::{CheckoutRequest, CheckoutSession, PaymentEvent, PaymentGateway},
        signature::verify_signature,
    },
    settings::PaymentSettings,
};

const CHECKOUT_SESSIONS_PATH: &str = "/v1/checkout/sessions";
const CHECKOUT_COMPLETED: &str = "checkout.session.completed";
const ORDER_ID_METADATA_KEY: &str = "order_id";

/// [`PaymentGateway`] backed by the Stripe REST API.
#[derive(Debug, Clone)]
pub struct StripeGateway {
    client: Client,
    settings: PaymentSettings,
}

impl StripeGateway {
    /// Build a gateway with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(settings: PaymentSettings) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .connect_timeout(settings.timeout)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self { client, settings })
    }

    fn checkout_form(&self, request: &CheckoutRequest) -> Vec<(&'static str, String)> {
        vec![
            ("mode", "payment".to_string()),
            ("success_url", self.settings.success_url.clone()),
            ("cancel_url", self.settings.cancel_url.clone()),
            (
                "line_items[0][price_data][currency]",
                self.settings.currency.clone(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                format!("Order #{}", request.order_uuid),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                request.amount_minor.to_string(),
            ),
            ("line_items[0][quantity]", "1".to_string()),
            ("metadata[order_id]", request.order_uuid.to_string()),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Event {
    #[serde(rename = "type")]
    kind: String,
    data: Option<EventData>,
}

#[derive(Debug, Deserialize)]
struct EventData {
    object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SessionObject {
    id: String,
    #[serde(default)]
    metadata: Option<HashMap<String, String>>,
}

fn decode_event(payload: &[u8]) -> Result<PaymentEvent, PaymentError> {
    let event: Event = serde_json::from_slice(payload).map_err(PaymentError::InvalidPayload)?;

    if event.kind != CHECKOUT_COMPLETED {
        return Ok(PaymentEvent::Other { kind: event.kind });
    }

    let object = event
        .data
        .map(|data| data.object)
        .unwrap_or(serde_json::Value::Null);

    let session: SessionObject =
        serde_json::from_value(object).map_err(PaymentError::InvalidPayload)?;

    let order_ref = session
        .metadata
        .and_then(|mut metadata| metadata.remove(ORDER_ID_METADATA_KEY));

    Ok(PaymentEvent::CheckoutCompleted {
        session_id: session.id,
        order_ref,
    })
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[tracing::instrument(skip(self, request), fields(order = %request.order_uuid), err)]
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!(
            "{}{CHECKOUT_SESSIONS_PATH}",
            self.settings.api_base.trim_end_matches('/')
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.settings.secret_key)
            .form(&self.checkout_form(&request))
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| status.to_string());

            warn!(status = status.as_u16(), %message, "checkout session rejected");

            return Err(PaymentError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let session: SessionResponse = response.json().await?;

        let checkout_url = session.url.ok_or(PaymentError::InvalidResponse)?;

        debug!(session_id = %session.id, "checkout session created");

        Ok(CheckoutSession {
            session_id: session.id,
            checkout_url,
        })
    }

    fn parse_event(
        &self,
        payload: &[u8],
        signature: Option<String>,
    ) -> Result<PaymentEvent, PaymentError> {
        if let Some(secret) = &self.settings.webhook_secret {
            let header = signature.ok_or(PaymentError::InvalidSignature)?;

            verify_signature(
                secret,
                payload,
                &header,
                Timestamp::now(),
                self.settings.webhook_tolerance,
            )?;
        }

        decode_event(payload)
    }
}
