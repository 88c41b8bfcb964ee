//! Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use ecom_app::{domain::checkout::CheckoutError, storage::StorageError};

use crate::observability::CheckoutOutcome;

pub(crate) fn into_status_error(error: CheckoutError) -> StatusError {
    match error {
        CheckoutError::EmptyCart
        | CheckoutError::InvalidQuantity { .. }
        | CheckoutError::QuantityOverflow { .. }
        | CheckoutError::TotalOverflow
        | CheckoutError::OutOfStock(_) => {
            warn!("rejected checkout: {error}");

            StatusError::bad_request().brief(error.to_string())
        }
        CheckoutError::ProductNotFound(_) => {
            warn!("rejected checkout: {error}");

            StatusError::not_found().brief(error.to_string())
        }
        CheckoutError::Storage(StorageError::DuplicateKey) => {
            StatusError::conflict().brief("Order already exists")
        }
        CheckoutError::Storage(source) => {
            error!("checkout failed: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn outcome(error: &CheckoutError) -> CheckoutOutcome {
    match error {
        CheckoutError::OutOfStock(_) => CheckoutOutcome::OutOfStock,
        CheckoutError::Storage(_) => CheckoutOutcome::Failed,
        CheckoutError::EmptyCart
        | CheckoutError::InvalidQuantity { .. }
        | CheckoutError::QuantityOverflow { .. }
        | CheckoutError::ProductNotFound(_)
        | CheckoutError::TotalOverflow => CheckoutOutcome::Rejected,
    }
}
