//! App Context

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::{
    auth::{AccessTokenError, AuthService, PgAuthService, TokenVerifier},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        users::{PgUsersService, UsersService},
    },
    payments::{PaymentError, PaymentGateway, StripeGateway},
    settings::AppSettings,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),

    #[error("invalid access token secret")]
    Token(#[source] AccessTokenError),

    #[error("failed to set up payment gateway")]
    Payments(#[source] PaymentError),
}

/// Every service the HTTP layer needs, behind their traits.
#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub auth: Arc<dyn AuthService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentGateway>,
}

impl AppContext {
    /// Build application context from settings.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting to or migrating the database fails,
    /// or when the token or payment settings are unusable.
    pub async fn from_settings(settings: &AppSettings) -> Result<Self, AppInitError> {
        let verifier =
            TokenVerifier::new(&settings.auth.token_secret).map_err(AppInitError::Token)?;

        let payments: Arc<dyn PaymentGateway> = Arc::new(
            StripeGateway::new(settings.payments.clone()).map_err(AppInitError::Payments)?,
        );

        let pool = database::connect(&settings.database)
            .await
            .map_err(AppInitError::Database)?;

        if settings.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;

            info!("database migrations applied");
        }

        let db = Db::new(pool);

        Ok(Self {
            users: Arc::new(PgUsersService::new(db.clone())),
            auth: Arc::new(PgAuthService::new(
                db.clone(),
                verifier,
                settings.auth.token_ttl,
            )),
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db, Arc::clone(&payments))),
            payments,
        })
    }
}
