//! Payments Config

use std::time::Duration;

use clap::Args;

use emporium_app::settings::PaymentSettings;

/// Signed webhooks older than this are rejected.
const WEBHOOK_TOLERANCE: Duration = Duration::from_secs(300);

/// Stripe settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Stripe secret API key
    #[arg(long, env = "STRIPE_SECRET_KEY", hide_env_values = true)]
    pub stripe_secret_key: String,

    /// Stripe webhook signing secret
    #[arg(long, env = "STRIPE_WEBHOOK_SECRET", hide_env_values = true)]
    pub stripe_webhook_secret: Option<String>,

    /// Stripe API base URL
    #[arg(long, env = "STRIPE_API_BASE", default_value = "https://api.stripe.com")]
    pub stripe_api_base: String,

    /// Checkout currency (ISO 4217, lowercase)
    #[arg(long, env = "STRIPE_CURRENCY", default_value = "usd")]
    pub stripe_currency: String,

    /// Redirect target after a successful payment
    #[arg(
        long,
        env = "STRIPE_SUCCESS_URL",
        default_value = "http://localhost:8698/payment/success"
    )]
    pub stripe_success_url: String,

    /// Redirect target after an abandoned checkout
    #[arg(
        long,
        env = "STRIPE_CANCEL_URL",
        default_value = "http://localhost:8698/payment/cancel"
    )]
    pub stripe_cancel_url: String,

    /// Outbound request timeout in seconds
    #[arg(long, env = "STRIPE_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub stripe_timeout_seconds: u64,
}

impl PaymentsConfig {
    pub(crate) fn settings(&self) -> PaymentSettings {
        PaymentSettings {
            secret_key: self.stripe_secret_key.clone(),
            webhook_secret: self
                .stripe_webhook_secret
                .clone()
                .filter(|secret| !secret.is_empty()),
            api_base: self.stripe_api_base.trim_end_matches('/').to_string(),
            currency: self.stripe_currency.clone(),
            success_url: self.stripe_success_url.clone(),
            cancel_url: self.stripe_cancel_url.clone(),
            timeout: Duration::from_secs(self.stripe_timeout_seconds),
            webhook_tolerance: WEBHOOK_TOLERANCE,
        }
    }
}
