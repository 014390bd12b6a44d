use clap::Args;
use emporium_app::domain::users::{
    PgUsersService, UsersService, UsersServiceError,
    data::NewUser,
    records::{UserRole, UserUuid},
};

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateAdminArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Display name of the administrator
    #[arg(long, env = "ADMIN_FULL_NAME", default_value = "Administrator")]
    full_name: String,

    /// Login email of the administrator
    #[arg(long, env = "ADMIN_EMAIL")]
    email: String,

    /// Initial password (at least 8 characters)
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(args: CreateAdminArgs) -> Result<(), String> {
    let db = args.database.connect().await?;

    let service = PgUsersService::new(db);

    let result = service
        .register_user(NewUser {
            uuid: UserUuid::new(),
            full_name: args.full_name,
            email: args.email.clone(),
            password: args.password,
            role: UserRole::Admin,
        })
        .await;

    match result {
        Ok(user) => {
            println!("admin_uuid: {}", user.uuid);
            println!("admin_email: {}", user.email);

            Ok(())
        }
        Err(UsersServiceError::AlreadyExists) => {
            println!("a user with email {} already exists; nothing to do", args.email);

            Ok(())
        }
        Err(error) => Err(format!("failed to create admin: {error}")),
    }
}
