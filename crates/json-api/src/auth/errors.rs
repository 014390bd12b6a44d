//! Auth Errors

use salvo::http::StatusError;
use tracing::error;

use emporium_app::auth::AuthServiceError;

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::NotFound => {
            StatusError::unauthorized().brief("Could not validate credentials")
        }
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Incorrect email or password")
        }
        AuthServiceError::Forbidden => StatusError::forbidden().brief("Admin access required"),
        AuthServiceError::Sql(source) => {
            error!("failed to access credentials: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Token(source) => {
            error!("failed to process access token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Expiry(source) => {
            error!("failed to compute token expiry: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::PasswordHash(source) => {
            error!("failed to verify password: {source}");

            StatusError::internal_server_error()
        }
    }
}
