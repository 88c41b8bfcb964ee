//! Cart Handlers

pub(crate) mod checkout;
