//! User Errors

use salvo::http::StatusError;
use tracing::error;

use emporium_app::domain::users::UsersServiceError;

pub(crate) fn into_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::AlreadyExists => StatusError::conflict().brief("Email already in use"),
        UsersServiceError::NotFound => StatusError::not_found().brief("User not found"),
        UsersServiceError::InvalidData(reason) => {
            StatusError::unprocessable_entity().brief(reason)
        }
        UsersServiceError::IncorrectPassword => {
            StatusError::bad_request().brief("Current password is incorrect")
        }
        UsersServiceError::PasswordMismatch => {
            StatusError::unprocessable_entity().brief("Passwords do not match")
        }
        UsersServiceError::PasswordHash(source) => {
            error!("failed to hash password: {source}");

            StatusError::internal_server_error()
        }
        UsersServiceError::Sql(source) => {
            error!("failed to access users: {source}");

            StatusError::internal_server_error()
        }
    }
}
