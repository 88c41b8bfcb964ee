//! Auth service errors.

use thiserror::Error;

use crate::{auth::TokenError, storage::StorageError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("invalid data")]
    InvalidData,

    #[error("email address is already registered")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid bearer token")]
    InvalidToken(#[from] TokenError),

    #[error("user not found")]
    NotFound,

    #[error("failed to hash password")]
    PasswordHash,

    #[error("storage error")]
    Storage(#[source] StorageError),
}

impl From<StorageError> for AuthServiceError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::NotFound,
            StorageError::DuplicateKey => Self::EmailTaken,
            StorageError::MissingRequiredData | StorageError::InvalidData => Self::InvalidData,
            error => Self::Storage(error),
        }
    }
}
