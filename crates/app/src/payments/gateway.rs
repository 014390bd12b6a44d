//! Payment gateway port.

use async_trait::async_trait;
use mockall::automock;

use crate::{domain::orders::records::OrderUuid, payments::errors::PaymentError};

/// A request for a hosted checkout page covering a whole order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub order_uuid: OrderUuid,

    /// Amount in the currency's minor unit.
    pub amount_minor: i64,
}

/// A checkout session created by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub session_id: String,
    pub checkout_url: String,
}

/// An authenticated event received from the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// The customer completed a checkout session.
    CheckoutCompleted {
        session_id: String,

        /// The order reference we attached when creating the session, if
        /// the event still carries it.
        order_ref: Option<String>,
    },

    /// Anything we do not act upon.
    Other { kind: String },
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session for an order.
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Authenticate and decode a webhook delivery.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidSignature`] when a signing secret is
    /// configured and `signature` is absent, stale or wrong, and
    /// [`PaymentError::InvalidPayload`] when the body is not an event.
    fn parse_event(
        &self,
        payload: &[u8],
        signature: Option<String>,
    ) -> Result<PaymentEvent, PaymentError>;
}
