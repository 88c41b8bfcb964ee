//! Products Data

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::domain::products::{
    errors::ProductsServiceError,
    records::{ProductRecord, ProductUuid},
};

/// Largest price `ecom.products.price` (`NUMERIC(12, 2)`) can store.
const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: Decimal,
    pub quantity: i32,
}

impl NewProduct {
    pub(crate) fn into_record(self) -> Result<ProductRecord, ProductsServiceError> {
        let name = self.name.trim().to_string();

        if name.is_empty() || self.quantity < 0 || !is_storable_price(self.price) {
            return Err(ProductsServiceError::InvalidData);
        }

        let now = Timestamp::now();

        Ok(ProductRecord {
            uuid: self.uuid,
            name,
            description: self.description,
            image: self.image,
            price: self.price,
            quantity: self.quantity,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }
}

/// Whole cents between zero and [`MAX_PRICE`]. Finer prices would be rounded by the column.
fn is_storable_price(price: Decimal) -> bool {
    !price.is_sign_negative() && price.normalize().scale() <= 2 && price <= MAX_PRICE
}
