//! Webhook signature verification.
//!
//! The header has the shape `t=<unix seconds>,v1=<hex>[,v1=<hex>...]`. Each
//! `v1` is an HMAC-SHA256 over `"{t}.{payload}"` keyed by the signing secret;
//! any one of them matching is enough.

use std::time::Duration;

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use sha2::Sha256;

use crate::payments::errors::PaymentError;

type HmacSha256 = Hmac<Sha256>;

const TIMESTAMP_KEY: &str = "t";
const SIGNATURE_KEY: &str = "v1";

#[derive(Debug, PartialEq, Eq)]
struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

fn parse_header(header: &str) -> Result<SignatureHeader, PaymentError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            return Err(PaymentError::InvalidSignature);
        };

        match key {
            TIMESTAMP_KEY => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_error| PaymentError::InvalidSignature)?,
                );
            }
            SIGNATURE_KEY => {
                // Undecodable candidates can never match; skip them.
                if let Ok(signature) = hex::decode(value) {
                    signatures.push(signature);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(PaymentError::InvalidSignature)?;

    if signatures.is_empty() {
        return Err(PaymentError::InvalidSignature);
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

/// Checks `header` against `payload`.
///
/// # Errors
///
/// Returns [`PaymentError::InvalidSignature`] when the header is malformed,
/// older than `tolerance` relative to `now`, or carries no matching `v1`.
pub(crate) fn verify_signature(
    secret: &str,
    payload: &[u8],
    header: &str,
    now: Timestamp,
    tolerance: Duration,
) -> Result<(), PaymentError> {
    let header = parse_header(header)?;

    let age = now.as_second().saturating_sub(header.timestamp);
    let tolerance = i64::try_from(tolerance.as_secs()).unwrap_or(i64::MAX);

    if age > tolerance {
        return Err(PaymentError::InvalidSignature);
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_error| PaymentError::InvalidSignature)?;

    mac.update(header.timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    let matched = header
        .signatures
        .iter()
        .any(|candidate| mac.clone().verify_slice(candidate).is_ok());

    if matched {
        Ok(())
    } else {
        Err(PaymentError::InvalidSignature)
    }
}
