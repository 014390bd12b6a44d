//! Auth service.

use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    auth::{
        AccessTokenMetadata, AccessTokenVersion, AuthServiceError, AuthenticatedUser,
        IssuedAccessToken, TokenVerifier, build_verifier_input, format_access_token,
        generate_access_token_secret,
        models::NewAccessToken,
        parse_access_token,
        repository::PgAuthRepository,
        verify_password,
    },
    database::Db,
    domain::users::{
        data::normalize_email,
        records::{UserRole, UserUuid},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
    users: PgUsersRepository,
    verifier: TokenVerifier,
    token_ttl: Duration,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, verifier: TokenVerifier, token_ttl: Duration) -> Self {
        Self {
            repository: PgAuthRepository::new(db.pool().clone()),
            users: PgUsersRepository::new(),
            db,
            verifier,
            token_ttl,
        }
    }

    /// Issue a new access token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry cannot be computed or the insert fails.
    pub async fn issue_access_token(
        &self,
        user_uuid: UserUuid,
    ) -> Result<IssuedAccessToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = AccessTokenVersion::V1;
        let secret = generate_access_token_secret();
        let token = format_access_token(token_uuid, version, &secret);

        let verifier_input = build_verifier_input(&token_uuid, version, &user_uuid, &secret);

        let expires_at = Timestamp::now()
            .checked_add(self.token_ttl)
            .map_err(AuthServiceError::Expiry)?;

        let metadata: AccessTokenMetadata = self
            .repository
            .create_access_token(&NewAccessToken {
                uuid: token_uuid,
                user_uuid,
                version,
                token_hash: self.verifier.compute(&verifier_input),
                expires_at,
            })
            .await?;

        Ok(IssuedAccessToken { token, metadata })
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    #[tracing::instrument(skip_all)]
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IssuedAccessToken, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let credentials = self
            .users
            .find_credentials_by_email(&mut tx, &normalize_email(email))
            .await?;

        tx.commit().await?;

        let Some(credentials) = credentials else {
            debug!("login for unknown email");

            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password(password, &credentials.password_hash).await? {
            debug!(user = %credentials.uuid, "login with wrong password");

            return Err(AuthServiceError::InvalidCredentials);
        }

        let issued = self.issue_access_token(credentials.uuid).await?;

        info!(user = %credentials.uuid, token = %issued.metadata.uuid, "access token issued");

        Ok(issued)
    }

    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticatedUser, AuthServiceError> {
        let parsed_token =
            parse_access_token(bearer_token).map_err(|_error| AuthServiceError::NotFound)?;

        let token = self
            .repository
            .find_active_access_token(parsed_token.token_uuid, parsed_token.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if token.version != parsed_token.version {
            return Err(AuthServiceError::NotFound);
        }

        let verifier_input = build_verifier_input(
            &parsed_token.token_uuid,
            parsed_token.version,
            &token.user_uuid,
            &parsed_token.secret,
        );

        if !self.verifier.verify(&verifier_input, &token.token_hash)? {
            return Err(AuthServiceError::NotFound);
        }

        // Best-effort metadata update; auth success should not depend on this write.
        let _touch_result = self
            .repository
            .touch_access_token_last_used(parsed_token.token_uuid)
            .await;

        Ok(AuthenticatedUser {
            uuid: token.user_uuid,
            role: token.role,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange an email/password pair for a fresh access token.
    async fn login(&self, email: &str, password: &str)
    -> Result<IssuedAccessToken, AuthServiceError>;

    /// Resolve a bearer token to the user it was issued for.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticatedUser, AuthServiceError>;
}

/// Require an administrator.
///
/// # Errors
///
/// Returns [`AuthServiceError::Forbidden`] for any other role.
pub fn require_admin(user: &AuthenticatedUser) -> Result<(), AuthServiceError> {
    match user.role {
        UserRole::Admin => Ok(()),
        UserRole::Customer => Err(AuthServiceError::Forbidden),
    }
}
