//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Error, FromRow, Postgres, Row, postgres::PgRow, query_builder::Separated};
use uuid::Uuid;

use crate::{
    domain::{
        orders::records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderStatus, OrderUuid},
        products::records::ProductUuid,
        users::records::UserUuid,
    },
    storage::Entity,
};

impl Entity for OrderRecord {
    const TABLE: &'static str = "ecom.orders";
    const COLUMNS: &'static [&'static str] = &["id", "user_id", "total", "status", "address"];

    fn id(&self) -> Uuid {
        self.uuid.into_uuid()
    }

    fn push_values(&self, values: &mut Separated<'_, 'static, Postgres, &'static str>) {
        values.push_bind(self.uuid.into_uuid());
        values.push_bind(self.user_uuid.into_uuid());
        values.push_bind(self.total);
        values.push_bind(self.status.as_str());
        values.push_bind(self.address.clone());
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<String, _>("status")?
            .parse::<OrderStatus>()
            .map_err(|error| Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(error),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("id")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_id")?),
            total: row.try_get("total")?,
            status,
            address: row.try_get("address")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl Entity for OrderItemRecord {
    const TABLE: &'static str = "ecom.order_items";
    const COLUMNS: &'static [&'static str] = &["id", "order_id", "product_id", "quantity", "price"];

    fn id(&self) -> Uuid {
        self.uuid.into_uuid()
    }

    fn push_values(&self, values: &mut Separated<'_, 'static, Postgres, &'static str>) {
        values.push_bind(self.uuid.into_uuid());
        values.push_bind(self.order_uuid.into_uuid());
        values.push_bind(self.product_uuid.into_uuid());
        values.push_bind(self.quantity);
        values.push_bind(self.price);
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("id")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_id")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_id")?),
            quantity: row.try_get("quantity")?,
            price: row.try_get("price")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
