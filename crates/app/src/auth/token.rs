//! Access token formatting, parsing, and verifier computation.
//!
//! A token looks like `em_v1_<token uuid>.<64 hex chars>`. Only an
//! HMAC-SHA256 verifier of the token material is stored; the raw token is
//! shown to the client once.

use std::{fmt, str::FromStr};

use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::users::records::UserUuid;

type HmacSha256 = Hmac<Sha256>;

/// Access token identifier prefix.
pub const ACCESS_TOKEN_PREFIX: &str = "em";

/// Number of secret bytes encoded in a token.
pub const ACCESS_TOKEN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTokenVersion {
    V1,
}

impl AccessTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }

    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl TryFrom<i16> for AccessTokenVersion {
    type Error = AccessTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(AccessTokenError::UnsupportedVersion),
        }
    }
}

impl FromStr for AccessTokenVersion {
    type Err = AccessTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(AccessTokenError::UnsupportedVersion),
        }
    }
}

#[derive(Clone)]
pub struct AccessTokenSecret {
    bytes: [u8; ACCESS_TOKEN_SECRET_BYTES],
}

impl AccessTokenSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ACCESS_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ACCESS_TOKEN_SECRET_BYTES] {
        &self.bytes
    }
}

impl fmt::Debug for AccessTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessTokenSecret(**redacted**)")
    }
}

impl Drop for AccessTokenSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Clone)]
pub struct ParsedAccessToken {
    pub token_uuid: Uuid,
    pub version: AccessTokenVersion,
    pub secret: AccessTokenSecret,
}

#[derive(Debug, Error)]
pub enum AccessTokenError {
    #[error("access token format is invalid")]
    InvalidFormat,

    #[error("access token uses an unsupported version")]
    UnsupportedVersion,

    #[error("access token secret encoding is invalid")]
    InvalidSecretEncoding,

    #[error("stored verifier is not valid hex")]
    InvalidVerifierEncoding,

    #[error("token signing key is empty")]
    InvalidKey,
}

/// Keyed verifier for access tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    mac: HmacSha256,
}

impl TokenVerifier {
    /// Create a verifier keyed with `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the key is empty.
    pub fn new(key: &str) -> Result<Self, AccessTokenError> {
        if key.is_empty() {
            return Err(AccessTokenError::InvalidKey);
        }

        let mac = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|_error| AccessTokenError::InvalidKey)?;

        Ok(Self { mac })
    }

    fn mac(&self, input: &[u8]) -> HmacSha256 {
        let mut mac = self.mac.clone();

        mac.update(input);

        mac
    }

    /// Hex verifier to persist for `input`.
    #[must_use]
    pub fn compute(&self, input: &[u8]) -> String {
        hex::encode(self.mac(input).finalize().into_bytes())
    }

    /// Check `input` against a stored hex verifier in constant time.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored verifier is not valid hex.
    pub fn verify(&self, input: &[u8], stored: &str) -> Result<bool, AccessTokenError> {
        let expected =
            hex::decode(stored).map_err(|_error| AccessTokenError::InvalidVerifierEncoding)?;

        Ok(self.mac(input).verify_slice(&expected).is_ok())
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenVerifier(**redacted**)")
    }
}

#[must_use]
pub fn generate_access_token_secret() -> AccessTokenSecret {
    let mut secret = [0_u8; ACCESS_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    AccessTokenSecret::from_bytes(secret)
}

#[must_use]
pub fn format_access_token(
    token_uuid: Uuid,
    version: AccessTokenVersion,
    secret: &AccessTokenSecret,
) -> String {
    format!(
        "{ACCESS_TOKEN_PREFIX}_{}_{}.{}",
        version.segment(),
        token_uuid.simple(),
        hex::encode(secret.as_bytes())
    )
}

/// Split a bearer token into its identifier, version, and secret.
///
/// # Errors
///
/// Returns an error if the token is malformed.
pub fn parse_access_token(token: &str) -> Result<ParsedAccessToken, AccessTokenError> {
    let (prefix_and_id, secret_hex) = token
        .split_once('.')
        .ok_or(AccessTokenError::InvalidFormat)?;

    let mut id_parts = prefix_and_id.splitn(3, '_');

    let prefix = id_parts.next().ok_or(AccessTokenError::InvalidFormat)?;
    let version_segment = id_parts.next().ok_or(AccessTokenError::InvalidFormat)?;
    let token_uuid_segment = id_parts.next().ok_or(AccessTokenError::InvalidFormat)?;

    if prefix != ACCESS_TOKEN_PREFIX {
        return Err(AccessTokenError::InvalidFormat);
    }

    let version = AccessTokenVersion::from_str(version_segment)?;

    let token_uuid =
        Uuid::try_parse(token_uuid_segment).map_err(|_error| AccessTokenError::InvalidFormat)?;

    let mut secret = [0_u8; ACCESS_TOKEN_SECRET_BYTES];

    hex::decode_to_slice(secret_hex, &mut secret)
        .map_err(|_error| AccessTokenError::InvalidSecretEncoding)?;

    Ok(ParsedAccessToken {
        token_uuid,
        version,
        secret: AccessTokenSecret::from_bytes(secret),
    })
}

/// Build the canonical HMAC input bytes for a token.
///
/// Format: `{token_uuid_hex}:{version_i16_decimal}:{user_uuid_hex}:{secret_hex}`
#[must_use]
pub fn build_verifier_input(
    token_uuid: &Uuid,
    version: AccessTokenVersion,
    user_uuid: &UserUuid,
    secret: &AccessTokenSecret,
) -> Vec<u8> {
    format!(
        "{}:{}:{}:{}",
        token_uuid.simple(),
        version.as_i16(),
        user_uuid.into_uuid().simple(),
        hex::encode(secret.as_bytes()),
    )
    .into_bytes()
}
