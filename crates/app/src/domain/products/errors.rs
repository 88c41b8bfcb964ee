//! Products service errors.

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product already exists")]
    AlreadyExists,

    #[error("product not found")]
    NotFound,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Storage(#[source] StorageError),
}

impl From<StorageError> for ProductsServiceError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::NotFound,
            StorageError::DuplicateKey => Self::AlreadyExists,
            StorageError::MissingRequiredData | StorageError::InvalidData => Self::InvalidData,
            error => Self::Storage(error),
        }
    }
}
