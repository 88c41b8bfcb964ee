//! Errors

use salvo::http::StatusError;
use tracing::error;

use ecom_app::auth::AuthServiceError;

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid registration or login payload")
        }
        AuthServiceError::EmailTaken => {
            StatusError::conflict().brief("Email address is already registered")
        }
        AuthServiceError::InvalidCredentials
        | AuthServiceError::InvalidToken(_)
        | AuthServiceError::NotFound => {
            StatusError::unauthorized().brief("Invalid email or password")
        }
        AuthServiceError::PasswordHash | AuthServiceError::Storage(_) => {
            error!("auth request failed: {error}");

            StatusError::internal_server_error()
        }
    }
}
