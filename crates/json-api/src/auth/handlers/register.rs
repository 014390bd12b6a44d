//! Register Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;

use emporium_app::domain::users::{
    UsersServiceError,
    data::NewUser,
    records::{UserRole, UserUuid},
};

use crate::{extensions::*, state::State, users};

/// Registration Request
#[derive(Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl From<RegisterRequest> for NewUser {
    fn from(request: RegisterRequest) -> Self {
        NewUser {
            uuid: UserUuid::new(),
            full_name: request.full_name,
            email: request.email,
            password: request.password,
            role: UserRole::Customer,
        }
    }
}

/// Register Handler
///
/// Creates a customer account.
#[endpoint(
    tags("auth"),
    summary = "Register",
    responses(
        (status_code = StatusCode::CREATED, description = "Account created"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid registration"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<users::me::UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let user = state
        .app
        .users
        .register_user(json.into_inner().into())
        .await
        .map_err(|error| match error {
            UsersServiceError::AlreadyExists => {
                StatusError::conflict().brief("Email already registered")
            }
            other => users::into_status_error(other),
        })?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use emporium_app::domain::users::records::UserRecord;

    use crate::{
        test_helpers::{Mocks, anonymous_service},
        users::me::UserResponse,
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        anonymous_service(mocks, Router::with_path("auth/register").post(handler))
    }

    fn body() -> serde_json::Value {
        json!({
            "full_name": "Jane Doe",
            "email": "jane@example.com",
            "password": "password123",
        })
    }

    #[tokio::test]
    async fn test_register_returns_201_with_customer_profile() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_register_user()
            .once()
            .withf(|user| {
                user.email == "jane@example.com"
                    && user.password == "password123"
                    && user.role == UserRole::Customer
            })
            .return_once(|user| {
                Ok(UserRecord {
                    uuid: user.uuid,
                    full_name: user.full_name,
                    email: user.email,
                    role: user.role,
                    created_at: Timestamp::UNIX_EPOCH,
                    updated_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut res = TestClient::post("http://example.com/auth/register")
            .json(&body())
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let user: UserResponse = res.take_json().await?;

        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.role, "customer");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_email_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_register_user()
            .once()
            .return_once(|_| Err(UsersServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/auth/register")
            .json(&body())
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_invalid_email_returns_422() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_register_user()
            .once()
            .return_once(|_| Err(UsersServiceError::InvalidData("email address is invalid")));

        let res = TestClient::post("http://example.com/auth/register")
            .json(&json!({
                "full_name": "Jane Doe",
                "email": "not-an-email",
                "password": "password123",
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
