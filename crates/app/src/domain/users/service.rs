//! Users service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::{hash_password, verify_password},
    database::Db,
    domain::users::{
        data::{
            NewUser, PasswordChange, ProfileUpdate, normalize_email, validate_email,
            validate_full_name, validate_password,
        },
        errors::UsersServiceError,
        records::{UserRecord, UserUuid},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    #[tracing::instrument(skip_all, fields(user = %user.uuid, role = %user.role))]
    async fn register_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        let full_name = user.full_name.trim();
        let email = normalize_email(&user.email);

        validate_full_name(full_name)?;
        validate_email(&email)?;
        validate_password(&user.password)?;

        let password_hash = hash_password(&user.password).await?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_user(
                &mut tx,
                user.uuid,
                full_name,
                &email,
                &password_hash,
                user.role,
            )
            .await?;

        tx.commit().await?;

        info!("user registered");

        Ok(created)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn update_profile(
        &self,
        user: UserUuid,
        update: ProfileUpdate,
    ) -> Result<UserRecord, UsersServiceError> {
        let full_name = update.full_name.as_deref().map(str::trim);
        let email = update.email.as_deref().map(normalize_email);

        if let Some(full_name) = full_name {
            validate_full_name(full_name)?;
        }

        if let Some(email) = email.as_deref() {
            validate_email(email)?;
        }

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_user(&mut tx, user, full_name, email.as_deref())
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self, change))]
    async fn change_password(
        &self,
        user: UserUuid,
        change: PasswordChange,
    ) -> Result<(), UsersServiceError> {
        if change.new_password != change.confirm_password {
            return Err(UsersServiceError::PasswordMismatch);
        }

        validate_password(&change.new_password)?;

        let mut tx = self.db.begin().await?;

        let credentials = self.repository.get_credentials(&mut tx, user).await?;

        if !verify_password(&change.current_password, &credentials.password_hash).await? {
            return Err(UsersServiceError::IncorrectPassword);
        }

        let password_hash = hash_password(&change.new_password).await?;

        if self
            .repository
            .update_password(&mut tx, user, &password_hash)
            .await?
            == 0
        {
            return Err(UsersServiceError::NotFound);
        }

        tx.commit().await?;

        info!("password changed");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Create a user account. The email must not already be registered.
    async fn register_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Change the name and/or email of a user.
    async fn update_profile(
        &self,
        user: UserUuid,
        update: ProfileUpdate,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Replace a user's password after checking the current one.
    async fn change_password(
        &self,
        user: UserUuid,
        change: PasswordChange,
    ) -> Result<(), UsersServiceError>;
}
