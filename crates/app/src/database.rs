//! Database connection management

use std::time::Duration;

use sqlx::{
    PgPool, Postgres, Transaction,
    error::{DatabaseError, ErrorKind},
    migrate::{MigrateError, Migrator},
    postgres::PgPoolOptions,
};

use crate::settings::DatabaseSettings;

/// Schema migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired or the
    /// transaction cannot be started.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL` with a bounded pool.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_seconds))
        .connect(&settings.url)
        .await
}

/// Apply any pending schema migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// What went wrong with a statement, in the terms service errors care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Failure {
    NoRows,
    Duplicate,
    DanglingReference,
    MissingValue,
    ConstraintViolated,
    Other,
}

pub(crate) fn classify(error: &sqlx::Error) -> Failure {
    if matches!(error, sqlx::Error::RowNotFound) {
        return Failure::NoRows;
    }

    match error.as_database_error().map(DatabaseError::kind) {
        Some(ErrorKind::UniqueViolation) => Failure::Duplicate,
        Some(ErrorKind::ForeignKeyViolation) => Failure::DanglingReference,
        Some(ErrorKind::NotNullViolation) => Failure::MissingValue,
        Some(ErrorKind::CheckViolation) => Failure::ConstraintViolated,
        Some(ErrorKind::Other | _) | None => Failure::Other,
    }
}
