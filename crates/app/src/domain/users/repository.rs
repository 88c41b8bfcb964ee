//! Users Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_builder::Separated};
use uuid::Uuid;

use crate::{
    domain::users::records::{UserRecord, UserUuid},
    storage::Entity,
};

impl Entity for UserRecord {
    const TABLE: &'static str = "ecom.users";
    const COLUMNS: &'static [&'static str] =
        &["id", "first_name", "last_name", "email", "password_hash"];

    fn id(&self) -> Uuid {
        self.uuid.into_uuid()
    }

    fn push_values(&self, values: &mut Separated<'_, 'static, Postgres, &'static str>) {
        values.push_bind(self.uuid.into_uuid());
        values.push_bind(self.first_name.clone());
        values.push_bind(self.last_name.clone());
        values.push_bind(self.email.clone());
        values.push_bind(self.password_hash.clone());
    }
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("id")?),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
