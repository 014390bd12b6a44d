//! Payment errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("webhook signature missing or invalid")]
    InvalidSignature,

    #[error("webhook payload could not be parsed")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("payment processor request failed")]
    Http(#[from] reqwest::Error),

    #[error("payment processor rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("payment processor returned an unexpected response")]
    InvalidResponse,
}
