//! Password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use tokio::task;

use crate::auth::AuthServiceError;

/// Accepted password lengths, in characters.
pub const PASSWORD_LENGTH: std::ops::RangeInclusive<usize> = 8..=128;

pub(crate) fn validate_password(password: &str) -> Result<(), AuthServiceError> {
    if PASSWORD_LENGTH.contains(&password.chars().count()) {
        Ok(())
    } else {
        Err(AuthServiceError::InvalidData)
    }
}

/// Hash a password into an Argon2id PHC string on the blocking pool.
pub(crate) async fn hash_password(password: String) -> Result<String, AuthServiceError> {
    task::spawn_blocking(move || hash_password_sync(&password))
        .await
        .map_err(|_join| AuthServiceError::PasswordHash)?
}

/// Check `password` against a stored PHC string on the blocking pool.
pub(crate) async fn verify_password(
    password: String,
    hash: String,
) -> Result<(), AuthServiceError> {
    task::spawn_blocking(move || verify_password_sync(&password, &hash))
        .await
        .map_err(|_join| AuthServiceError::PasswordHash)?
}

fn hash_password_sync(password: &str) -> Result<String, AuthServiceError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_source| AuthServiceError::PasswordHash)
}

/// Any failure, including an unparseable stored hash, is reported as bad credentials.
fn verify_password_sync(password: &str, hash: &str) -> Result<(), AuthServiceError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_malformed| AuthServiceError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_mismatch| AuthServiceError::InvalidCredentials)
}
