//! Money amounts on the wire.

use rust_decimal::{Decimal, prelude::ToPrimitive as _};
use salvo::prelude::StatusError;
use tracing::error;

/// Render an exact amount as a JSON number.
pub(crate) fn to_json_number(amount: Decimal) -> Result<f64, StatusError> {
    amount.to_f64().ok_or_else(|| {
        error!(%amount, "amount cannot be represented as a JSON number");

        StatusError::internal_server_error()
    })
}
