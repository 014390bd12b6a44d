//! Auth data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    auth::AccessTokenVersion,
    domain::users::records::{UserRole, UserUuid},
};

/// The caller behind a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub uuid: UserUuid,
    pub role: UserRole,
}

impl AuthenticatedUser {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}

/// Access token data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveAccessToken {
    /// User that owns this token.
    pub user_uuid: UserUuid,

    /// Role of the owning user at lookup time.
    pub role: UserRole,

    /// Token format/hash version.
    pub version: AccessTokenVersion,

    /// HMAC verifier for the token secret material.
    pub token_hash: String,
}

/// Access token metadata persisted in storage.
#[derive(Debug, Clone)]
pub struct AccessTokenMetadata {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub version: AccessTokenVersion,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// New access token persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewAccessToken {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub version: AccessTokenVersion,
    pub token_hash: String,
    pub expires_at: Timestamp,
}

/// Access token issuance result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedAccessToken {
    pub token: String,
    pub metadata: AccessTokenMetadata,
}
