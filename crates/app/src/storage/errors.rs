//! Storage errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// `query_canceled`, raised when `statement_timeout` fires.
const QUERY_CANCELED: &str = "57014";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record not found")]
    NotFound,

    #[error("record already exists")]
    DuplicateKey,

    #[error("related record not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    #[error("storage operation timed out")]
    TimedOut,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for StorageError {
    fn from(error: Error) -> Self {
        match &error {
            Error::RowNotFound => return Self::NotFound,
            Error::PoolTimedOut => return Self::TimedOut,
            _ => {}
        }

        let Some(database_error) = error.as_database_error() else {
            return Self::Sql(error);
        };

        if database_error.code().as_deref() == Some(QUERY_CANCELED) {
            return Self::TimedOut;
        }

        match DatabaseError::kind(database_error) {
            ErrorKind::UniqueViolation => Self::DuplicateKey,
            ErrorKind::ForeignKeyViolation => Self::InvalidReference,
            ErrorKind::NotNullViolation => Self::MissingRequiredData,
            ErrorKind::CheckViolation => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
