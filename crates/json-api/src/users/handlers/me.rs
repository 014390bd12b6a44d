//! Current User Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use emporium_app::domain::users::records::UserRecord;

use crate::{extensions::*, state::State, users::into_status_error};

/// User Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    /// The unique identifier of the user
    pub uuid: Uuid,

    pub full_name: String,

    pub email: String,

    /// `customer` or `admin`
    pub role: String,

    /// The date and time the user registered
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            uuid: user.uuid.into(),
            full_name: user.full_name,
            email: user.email,
            role: user.role.as_str().to_string(),
            created_at: user.created_at.to_string(),
        }
    }
}

/// Current User Handler
///
/// Returns the profile of the authenticated user.
#[endpoint(
    tags("users"),
    summary = "Get Current User",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let user = state
        .app
        .users
        .get_user(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
