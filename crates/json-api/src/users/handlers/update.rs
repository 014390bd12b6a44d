//! Update Current User Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use emporium_app::domain::users::data::ProfileUpdate;

use crate::{
    extensions::*,
    state::State,
    users::{into_status_error, me::UserResponse},
};

/// Profile Update Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateUserRequest {
    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

impl From<UpdateUserRequest> for ProfileUpdate {
    fn from(request: UpdateUserRequest) -> Self {
        ProfileUpdate {
            full_name: request.full_name,
            email: request.email,
        }
    }
}

/// Update Current User Handler
#[endpoint(
    tags("users"),
    summary = "Update Current User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile updated"),
        (status_code = StatusCode::CONFLICT, description = "Email already in use"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid profile"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateUserRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let user = state
        .app
        .users
        .update_profile(user.uuid, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use emporium_app::domain::users::UsersServiceError;

    use crate::{
        test_helpers::{Mocks, TEST_CUSTOMER_UUID, customer_service},
        users::me::tests::make_user,
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        customer_service(mocks, Router::with_path("users/me").patch(handler))
    }

    #[tokio::test]
    async fn test_update_forwards_only_present_fields() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_update_profile()
            .once()
            .withf(|uuid, update| {
                *uuid == TEST_CUSTOMER_UUID
                    && *update
                        == ProfileUpdate {
                            full_name: Some("Janet Doe".to_string()),
                            email: None,
                        }
            })
            .return_once(|uuid, _| {
                let mut user = make_user(uuid);
                user.full_name = "Janet Doe".to_string();

                Ok(user)
            });

        let mut res = TestClient::patch("http://example.com/users/me")
            .json(&json!({ "full_name": "Janet Doe" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let user: UserResponse = res.take_json().await?;

        assert_eq!(user.full_name, "Janet Doe");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_to_taken_email_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_update_profile()
            .once()
            .return_once(|_, _| Err(UsersServiceError::AlreadyExists));

        let res = TestClient::patch("http://example.com/users/me")
            .json(&json!({ "email": "taken@example.com" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
