//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use ecom_app::domain::products::ProductsServiceError;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        ProductsServiceError::InvalidData => StatusError::bad_request().brief("Invalid product"),
        ProductsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Product already exists")
        }
        ProductsServiceError::Storage(source) => {
            error!("failed to fetch product: {source}");

            StatusError::internal_server_error()
        }
    }
}
