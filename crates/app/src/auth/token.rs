//! Bearer token formatting, parsing, and signing.
//!
//! Tokens are stateless: `ec_{version}_{user_uuid_hex}_{expires_unix}.{mac}` where `mac` is the
//! unpadded base64url HMAC-SHA256 of [`build_signing_input`].

use std::{fmt, str::FromStr};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use jiff::Timestamp;
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::users::records::UserUuid;

/// Bearer token identifier prefix.
pub const TOKEN_PREFIX: &str = "ec";

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenVersion {
    V1,
}

impl TokenVersion {
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

impl FromStr for TokenVersion {
    type Err = TokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(TokenError::UnsupportedVersion),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token format is invalid")]
    InvalidFormat,

    #[error("token uses an unsupported version")]
    UnsupportedVersion,

    #[error("token signature encoding is invalid")]
    InvalidSignatureEncoding,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token signing secret must be at least {MIN_SECRET_BYTES} bytes")]
    WeakSecret,

    #[error("token expiry is out of range")]
    InvalidExpiry,
}

/// The claims carried by a token, before the signature is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToken {
    pub user_uuid: Uuid,
    pub version: TokenVersion,
    pub expires_unix: i64,
    pub signature: Vec<u8>,
}

#[must_use]
pub fn format_token(
    user_uuid: Uuid,
    version: TokenVersion,
    expires_unix: i64,
    signature: &[u8],
) -> String {
    format!(
        "{TOKEN_PREFIX}_{}_{}_{expires_unix}.{}",
        version.segment(),
        user_uuid.simple(),
        URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Split a token into its claims and signature without verifying it.
///
/// # Errors
///
/// Returns a [`TokenError`] describing the first malformed segment.
pub fn parse_token(token: &str) -> Result<ParsedToken, TokenError> {
    let (claims, signature) = token.split_once('.').ok_or(TokenError::InvalidFormat)?;

    let mut parts = claims.splitn(4, '_');

    let prefix = parts.next().ok_or(TokenError::InvalidFormat)?;
    let version_segment = parts.next().ok_or(TokenError::InvalidFormat)?;
    let user_segment = parts.next().ok_or(TokenError::InvalidFormat)?;
    let expires_segment = parts.next().ok_or(TokenError::InvalidFormat)?;

    if prefix != TOKEN_PREFIX {
        return Err(TokenError::InvalidFormat);
    }

    let version = TokenVersion::from_str(version_segment)?;

    let user_uuid =
        Uuid::try_parse(user_segment).map_err(|_source| TokenError::InvalidFormat)?;

    let expires_unix = expires_segment
        .parse::<i64>()
        .map_err(|_source| TokenError::InvalidFormat)?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_source| TokenError::InvalidSignatureEncoding)?;

    Ok(ParsedToken {
        user_uuid,
        version,
        expires_unix,
        signature,
    })
}

/// Build the canonical HMAC input bytes for a token.
///
/// Format: `{user_uuid_hex}:{version_i16_decimal}:{expires_unix}`
#[must_use]
pub fn build_signing_input(user_uuid: &Uuid, version: TokenVersion, expires_unix: i64) -> Vec<u8> {
    format!(
        "{}:{}:{expires_unix}",
        user_uuid.simple(),
        version.as_i16()
    )
    .into_bytes()
}

/// Issues and verifies bearer tokens with one HMAC key.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
}

impl TokenSigner {
    /// # Errors
    ///
    /// Returns [`TokenError::WeakSecret`] when `secret` is shorter than [`MIN_SECRET_BYTES`].
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        let mut key = secret.into();

        if key.len() < MIN_SECRET_BYTES {
            key.zeroize();

            return Err(TokenError::WeakSecret);
        }

        Ok(Self { key })
    }

    /// Sign a token for `user` that stops being accepted at `expires_at`.
    ///
    /// # Errors
    ///
    /// Returns an error when the key cannot initialise the MAC.
    pub fn issue(&self, user: UserUuid, expires_at: Timestamp) -> Result<String, TokenError> {
        let version = TokenVersion::V1;
        let user_uuid = user.into_uuid();
        let expires_unix = expires_at.as_second();

        let mut mac = self.mac()?;

        mac.update(&build_signing_input(&user_uuid, version, expires_unix));

        Ok(format_token(
            user_uuid,
            version,
            expires_unix,
            &mac.finalize().into_bytes(),
        ))
    }

    /// Check the signature and expiry of `token` at `now`, returning the user it was issued to.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::BadSignature`] for forged or altered tokens and
    /// [`TokenError::Expired`] once `now` reaches the expiry.
    pub fn verify(&self, token: &str, now: Timestamp) -> Result<UserUuid, TokenError> {
        let parsed = parse_token(token)?;

        let mut mac = self.mac()?;

        mac.update(&build_signing_input(
            &parsed.user_uuid,
            parsed.version,
            parsed.expires_unix,
        ));

        mac.verify_slice(&parsed.signature)
            .map_err(|_mismatch| TokenError::BadSignature)?;

        let expires_at = Timestamp::from_second(parsed.expires_unix)
            .map_err(|_range| TokenError::InvalidExpiry)?;

        if now >= expires_at {
            return Err(TokenError::Expired);
        }

        Ok(UserUuid::from_uuid(parsed.user_uuid))
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        <HmacSha256 as Mac>::new_from_slice(&self.key)
            .map_err(|_length| TokenError::WeakSecret)
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSigner(**redacted**)")
    }
}

impl Drop for TokenSigner {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
