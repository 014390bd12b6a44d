//! `x-request-id` handling.

use salvo::{http::header::HeaderValue, prelude::Response};
use tracing::warn;
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

/// The caller's request id, or a fresh UUIDv7 when it sent none.
pub(super) fn request_id_from(header: Option<String>) -> String {
    header
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

pub(super) fn echo_request_id(res: &mut Response, request_id: &str) {
    match HeaderValue::from_str(request_id) {
        Ok(value) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(source) => warn!(request_id, "request id is not a valid header value: {source}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_request_id_is_kept() {
        assert_eq!(request_id_from(Some(" abc-123 ".to_string())), "abc-123");
    }

    #[test]
    fn missing_or_blank_request_id_is_generated() {
        for header in [None, Some("   ".to_string())] {
            let generated = request_id_from(header);

            assert!(Uuid::parse_str(&generated).is_ok(), "expected a generated uuid");
        }
    }

    #[test]
    fn request_id_is_echoed_on_the_response() {
        let mut res = Response::new();

        echo_request_id(&mut res, "abc-123");

        assert_eq!(
            res.headers().get(REQUEST_ID_HEADER).and_then(|value| value.to_str().ok()),
            Some("abc-123")
        );
    }
}
