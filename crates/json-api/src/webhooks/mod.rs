//! Payment processor webhooks

pub(crate) mod stripe;
