//! Password hashing.

use argon2::{
    Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _,
    password_hash::{self, SaltString},
};
use rand::{RngCore, rngs::OsRng};
use thiserror::Error;
use tokio::task::{JoinError, spawn_blocking};

const SALT_BYTES: usize = 16;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("password hashing failed: {0}")]
    Hasher(password_hash::Error),

    #[error("password hashing task failed")]
    Worker(#[from] JoinError),
}

/// Hash a password into an Argon2id PHC string.
///
/// Runs on the blocking pool.
///
/// # Errors
///
/// Returns an error if the hasher rejects its parameters or the blocking
/// task does not complete.
pub async fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let password = password.to_owned();

    spawn_blocking(move || hash_blocking(&password)).await?
}

/// Check a password against a stored PHC string on the blocking pool.
///
/// # Errors
///
/// Returns an error if the stored hash cannot be parsed or the blocking
/// task does not complete.
pub async fn verify_password(
    password: &str,
    stored_hash: &str,
) -> Result<bool, PasswordHashError> {
    let password = password.to_owned();
    let stored_hash = stored_hash.to_owned();

    spawn_blocking(move || verify_blocking(&password, &stored_hash)).await?
}

fn hash_blocking(password: &str) -> Result<String, PasswordHashError> {
    let mut salt = [0_u8; SALT_BYTES];

    OsRng.fill_bytes(&mut salt);

    let salt = SaltString::encode_b64(&salt).map_err(PasswordHashError::Hasher)?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordHashError::Hasher)
}

fn verify_blocking(password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(stored_hash).map_err(PasswordHashError::Hasher)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(source) => Err(PasswordHashError::Hasher(source)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn hashes_verify_against_their_password_only() -> TestResult {
        let hash = hash_password("correct horse battery").await?;

        assert!(hash.starts_with("$argon2id$"), "expected an argon2id PHC string");
        assert!(verify_password("correct horse battery", &hash).await?);
        assert!(!verify_password("wrong horse battery", &hash).await?);

        Ok(())
    }

    #[tokio::test]
    async fn same_password_gets_distinct_salts() -> TestResult {
        let first = hash_password("repeatable").await?;
        let second = hash_password("repeatable").await?;

        assert_ne!(first, second, "salts should differ between hashes");

        Ok(())
    }

    #[tokio::test]
    async fn garbage_hash_is_an_error() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string").await,
            Err(PasswordHashError::Hasher(_))
        ));
    }

    #[tokio::test]
    async fn hashing_yields_to_other_tasks() -> TestResult {
        let other_task_ran = AtomicBool::new(false);

        let ((hash, ran_before_hash_finished), ()) = tokio::join!(
            async {
                let hash = hash_password("off the runtime").await;

                (hash, other_task_ran.load(Ordering::SeqCst))
            },
            async { other_task_ran.store(true, Ordering::SeqCst) },
        );

        hash?;

        assert!(
            ran_before_hash_finished,
            "the runtime thread should stay free while argon2 runs"
        );

        Ok(())
    }
}
