use clap::{Args, Parser, Subcommand};
use emporium_app::{
    database::{self, Db},
    settings::DatabaseSettings,
};

mod admin;
mod db;

#[derive(Debug, Parser)]
#[command(name = "emporium-app", about = "Emporium administration CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Admin(admin::AdminCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Admin(command) => admin::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

/// Connection options shared by every subcommand.
#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Seconds to wait for a connection
    #[arg(long, env = "DATABASE_ACQUIRE_TIMEOUT_SECONDS", default_value_t = 5)]
    acquire_timeout_seconds: u64,
}

impl DatabaseArgs {
    pub(crate) async fn connect(&self) -> Result<Db, String> {
        let pool = database::connect(&DatabaseSettings {
            url: self.database_url.clone(),
            max_connections: 1,
            acquire_timeout_seconds: self.acquire_timeout_seconds,
        })
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

        Ok(Db::new(pool))
    }
}
