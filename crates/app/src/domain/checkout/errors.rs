//! Checkout errors.

use thiserror::Error;

use crate::{domain::products::records::ProductUuid, storage::StorageError};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("quantity must be greater than 0 for product {product}")]
    InvalidQuantity { product: ProductUuid },

    #[error("requested quantity for product {product} is too large")]
    QuantityOverflow { product: ProductUuid },

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("product {0} is out of stock")]
    OutOfStock(ProductUuid),

    #[error("order total is too large")]
    TotalOverflow,

    #[error("storage error")]
    Storage(#[from] StorageError),
}
