//! Checkout Data

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::{
    checkout::errors::CheckoutError, orders::records::OrderUuid, products::records::ProductUuid,
};

/// A cart submitted for checkout. Carts are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItem {
    pub product: ProductUuid,
    pub quantity: i32,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order: OrderUuid,
    pub total: Decimal,
}

/// One validated cart line per distinct product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CartLine {
    pub product: ProductUuid,
    pub quantity: i32,
}

impl Cart {
    /// Validate the cart and merge repeated products into single lines, sorted by product id.
    pub(crate) fn lines(&self) -> Result<Vec<CartLine>, CheckoutError> {
        if self.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut merged = BTreeMap::<ProductUuid, i32>::new();

        for item in &self.items {
            if item.quantity <= 0 {
                return Err(CheckoutError::InvalidQuantity {
                    product: item.product,
                });
            }

            let quantity = merged.entry(item.product).or_default();

            *quantity = quantity
                .checked_add(item.quantity)
                .ok_or(CheckoutError::QuantityOverflow {
                    product: item.product,
                })?;
        }

        Ok(merged
            .into_iter()
            .map(|(product, quantity)| CartLine { product, quantity })
            .collect())
    }

    /// Delivery address with surrounding whitespace removed; blank addresses are dropped.
    pub(crate) fn delivery_address(&self) -> Option<String> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(ToString::to_string)
    }
}
