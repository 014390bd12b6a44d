//! Change Password Handler

use std::{fmt, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use emporium_app::domain::users::data::PasswordChange;

use crate::{extensions::*, state::State, users::into_status_error};

/// Password Change Request
#[derive(Deserialize, ToSchema)]
pub(crate) struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChangePasswordRequest(**redacted**)")
    }
}

impl From<ChangePasswordRequest> for PasswordChange {
    fn from(request: ChangePasswordRequest) -> Self {
        PasswordChange {
            current_password: request.current_password,
            new_password: request.new_password,
            confirm_password: request.confirm_password,
        }
    }
}

/// Message Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    pub message: String,
}

/// Change Password Handler
#[endpoint(
    tags("users"),
    summary = "Change Password",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Password updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Current password is incorrect"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Passwords do not match"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ChangePasswordRequest>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    state
        .app
        .users
        .change_password(user.uuid, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}
