//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_builder::Separated};
use uuid::Uuid;

use crate::{
    domain::products::records::{ProductRecord, ProductUuid},
    storage::Entity,
};

impl Entity for ProductRecord {
    const TABLE: &'static str = "ecom.products";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "description", "image", "price", "quantity"];
    const SOFT_DELETE_COLUMN: Option<&'static str> = Some("deleted_at");

    fn id(&self) -> Uuid {
        self.uuid.into_uuid()
    }

    fn push_values(&self, values: &mut Separated<'_, 'static, Postgres, &'static str>) {
        values.push_bind(self.uuid.into_uuid());
        values.push_bind(self.name.clone());
        values.push_bind(self.description.clone());
        values.push_bind(self.image.clone());
        values.push_bind(self.price);
        values.push_bind(self.quantity);
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            image: row.try_get("image")?,
            price: row.try_get("price")?,
            quantity: row.try_get("quantity")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
