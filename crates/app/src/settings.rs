//! Application settings.
//!
//! Built once by the binaries from their command line and environment and
//! handed to [`AppContext`](crate::context::AppContext); nothing below this
//! module reads the process environment.

use std::{fmt, time::Duration};

/// Store connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// `PostgreSQL` connection string.
    pub url: String,

    /// Upper bound on pooled connections.
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection before failing.
    pub acquire_timeout_seconds: u64,
}

/// Access token settings.
#[derive(Clone)]
pub struct AuthSettings {
    /// Key for the access token verifier HMAC.
    pub token_secret: String,

    /// Lifetime of a freshly issued access token.
    pub token_ttl: Duration,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("token_secret", &"**redacted**")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Payment processor settings.
#[derive(Clone)]
pub struct PaymentSettings {
    /// Secret API key used for outbound calls.
    pub secret_key: String,

    /// Webhook signing secret. When absent, webhook payloads are accepted
    /// without signature verification.
    pub webhook_secret: Option<String>,

    /// Base URL of the processor API.
    pub api_base: String,

    /// ISO 4217 currency code sent with checkout sessions.
    pub currency: String,

    /// Where the customer lands after paying.
    pub success_url: String,

    /// Where the customer lands after abandoning checkout.
    pub cancel_url: String,

    /// Outbound request timeout.
    pub timeout: Duration,

    /// Maximum accepted age of a signed webhook.
    pub webhook_tolerance: Duration,
}

impl fmt::Debug for PaymentSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentSettings")
            .field("secret_key", &"**redacted**")
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "**redacted**"),
            )
            .field("api_base", &self.api_base)
            .field("currency", &self.currency)
            .field("success_url", &self.success_url)
            .field("cancel_url", &self.cancel_url)
            .field("timeout", &self.timeout)
            .field("webhook_tolerance", &self.webhook_tolerance)
            .finish()
    }
}

/// Everything [`AppContext`](crate::context::AppContext) needs to start.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub payments: PaymentSettings,

    /// Apply pending migrations while starting up.
    pub run_migrations: bool,
}
