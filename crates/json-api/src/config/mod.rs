//! Server configuration module

use std::time::Duration;

use clap::Parser;

use emporium_app::settings::{AppSettings, AuthSettings};

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    payments::PaymentsConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod payments;
pub(crate) mod server;

const SECONDS_PER_MINUTE: u64 = 60;

/// Emporium JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "emporium-json", about = "Emporium JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Access token settings.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// Payment processor settings.
    #[command(flatten)]
    pub payments: PaymentsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings handed to the application context.
    #[must_use]
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            database: self.database.settings(),
            auth: AuthSettings {
                token_secret: self.auth.token_secret.clone(),
                token_ttl: Duration::from_secs(
                    self.auth.token_ttl_minutes.saturating_mul(SECONDS_PER_MINUTE),
                ),
            },
            payments: self.payments.settings(),
            run_migrations: self.database.run_migrations,
        }
    }
}
