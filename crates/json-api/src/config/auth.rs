//! Auth Config

use clap::Args;

/// Access token settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Key for the access token verifier HMAC
    #[arg(long, env = "TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: String,

    /// Access token lifetime in minutes
    #[arg(long, env = "TOKEN_TTL_MINUTES", default_value_t = 10_u64)]
    pub token_ttl_minutes: u64,
}
