//! Per-test `PostgreSQL` databases inside one shared container.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool, postgres::PgPoolOptions};
use testcontainers_modules::{
    postgres::Postgres as PostgresImage,
    testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner},
};
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

use crate::database::MIGRATOR;

const USER: &str = "emporium_test";
const PASSWORD: &str = "emporium_test_password";

/// Pool size for each test database. Large enough for the concurrent
/// order tests to hold two transactions at once.
const POOL_SIZE: u32 = 8;

/// Database names must be plain identifiers so they can be interpolated into
/// `CREATE DATABASE` / `DROP DATABASE`.
fn validate_database_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > 63 {
        return Err("database name must be 1-63 characters long".to_string());
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err("database name must start with a letter or underscore".to_string());
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("database name may only contain letters, digits and underscores".to_string());
    }

    Ok(())
}

async fn init_postgres_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(USER)
        .with_password(PASSWORD)
        .with_db_name(USER)
        .with_tag("17-alpine")
        .start()
        .await
        .expect("failed to start PostgreSQL container")
}

static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn init_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(db_name) = receiver.recv().await {
            drop_database(&db_name).await;
        }
    });

    sender
}

async fn server_url(database: &str) -> String {
    let container = POSTGRES_CONTAINER
        .get_or_init(init_postgres_container)
        .await;

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("failed to get container port");

    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    format!("postgresql://{USER}:{PASSWORD}@{host}:{port}/{database}")
}

async fn drop_database(db_name: &str) {
    if POSTGRES_CONTAINER.get().is_none() || validate_database_name(db_name).is_err() {
        return;
    }

    if let Ok(mut conn) = PgConnection::connect(&server_url("postgres").await).await {
        let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
            .execute(&mut conn)
            .await;

        let _ = conn.close().await;
    }
}

/// A freshly migrated database, dropped in the background once the value goes
/// out of scope.
///
/// Every test gets its own database, so services commit normally and no
/// rollback tricks are needed to keep tests apart.
#[derive(Debug, Clone)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub async fn new() -> Self {
        let name = format!("emporium_test_{}", Uuid::now_v7().simple());

        Self::with_name(&name).await
    }

    pub async fn with_name(db_name: &str) -> Self {
        CLEANUP_SENDER.get_or_init(init_cleanup_task).await;

        if let Err(error) = validate_database_name(db_name) {
            panic!("invalid database name '{db_name}': {error}");
        }

        let mut conn = PgConnection::connect(&server_url("postgres").await)
            .await
            .expect("failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
            .execute(&mut conn)
            .await
            .expect("failed to create test database");

        conn.close().await.expect("failed to close admin connection");

        let pool = PgPoolOptions::new()
            .max_connections(POOL_SIZE)
            .connect(&server_url(db_name).await)
            .await
            .expect("failed to connect to test database");

        MIGRATOR
            .run(&pool)
            .await
            .expect("failed to run migrations on test database");

        Self {
            pool,
            name: db_name.to_string(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_names_are_plain_identifiers() {
        assert!(validate_database_name("emporium_test_01").is_ok());
        assert!(validate_database_name("_leading_underscore").is_ok());

        assert!(validate_database_name("").is_err());
        assert!(validate_database_name(&"a".repeat(64)).is_err());
        assert!(validate_database_name("1starts_with_digit").is_err());
        assert!(validate_database_name("has-hyphen").is_err());
        assert!(validate_database_name("has\"quote").is_err());
    }

    #[tokio::test]
    async fn databases_are_migrated_and_isolated() {
        let first = TestDb::new().await;
        let second = TestDb::new().await;

        assert_ne!(first.name(), second.name());

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(first.pool())
            .await
            .expect("users table should exist after migrations");

        assert_eq!(users, 0, "a new database starts empty");
    }
}
