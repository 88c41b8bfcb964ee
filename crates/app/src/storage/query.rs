//! SQL composition for the generic repository.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::{
    entity::Entity,
    errors::StorageError,
    filter::{FieldValue, Filter, Op},
};

pub(crate) type PgQueryBuilder = QueryBuilder<'static, Postgres>;

pub(crate) fn select<T: Entity>(filter: &Filter) -> Result<PgQueryBuilder, StorageError> {
    if let Some(column) = filter.columns().find(|column| !T::has_column(column)) {
        return Err(StorageError::UnknownColumn(column.to_string()));
    }

    let mut builder = PgQueryBuilder::new("SELECT * FROM ");
    builder.push(T::TABLE);

    let mut keyword = " WHERE ";

    if let Some(column) = T::SOFT_DELETE_COLUMN
        && !filter.includes_deleted()
    {
        builder.push(keyword).push(column).push(" IS NULL");
        keyword = " AND ";
    }

    for condition in filter.conditions() {
        builder
            .push(keyword)
            .push(condition.column)
            .push(condition.op.as_sql());

        keyword = " AND ";

        match (condition.op, condition.value.clone()) {
            (Op::IsNull | Op::IsNotNull, _) => {}
            (Op::In, Some(value)) => {
                push_value(&mut builder, value);
                builder.push(")");
            }
            (_, Some(value)) => push_value(&mut builder, value),
            (_, None) => return Err(StorageError::MissingRequiredData),
        }
    }

    for (index, (column, direction)) in filter.ordering().iter().enumerate() {
        builder
            .push(if index == 0 { " ORDER BY " } else { ", " })
            .push(column)
            .push(direction.as_sql());
    }

    if let Some(limit) = filter.get_limit() {
        builder.push(" LIMIT ").push_bind(i64::from(limit));
    }

    if let Some(offset) = filter.get_offset() {
        builder.push(" OFFSET ").push_bind(i64::from(offset));
    }

    if filter.locks_rows() {
        builder.push(" FOR UPDATE");
    }

    Ok(builder)
}

pub(crate) fn insert<T: Entity>(entity: &T) -> PgQueryBuilder {
    let mut builder = PgQueryBuilder::new("INSERT INTO ");

    builder
        .push(T::TABLE)
        .push(" (")
        .push(T::COLUMNS.join(", "))
        .push(") VALUES (");

    entity.push_values(&mut builder.separated(", "));

    builder.push(")");
    builder
}

pub(crate) fn upsert<T: Entity>(entity: &T) -> PgQueryBuilder {
    let mut builder = insert(entity);

    builder.push(" ON CONFLICT (id) DO UPDATE SET ");

    for column in T::COLUMNS.iter().filter(|column| **column != "id") {
        builder
            .push(column)
            .push(" = EXCLUDED.")
            .push(column)
            .push(", ");
    }

    builder.push("updated_at = now()");
    builder
}

pub(crate) fn delete<T: Entity>(id: Uuid) -> PgQueryBuilder {
    let mut builder = PgQueryBuilder::new("");

    match T::SOFT_DELETE_COLUMN {
        Some(column) => {
            builder
                .push("UPDATE ")
                .push(T::TABLE)
                .push(" SET ")
                .push(column)
                .push(" = now(), updated_at = now() WHERE id = ")
                .push_bind(id)
                .push(" AND ")
                .push(column)
                .push(" IS NULL");
        }
        None => {
            builder
                .push("DELETE FROM ")
                .push(T::TABLE)
                .push(" WHERE id = ")
                .push_bind(id);
        }
    }

    builder
}

fn push_value(builder: &mut PgQueryBuilder, value: FieldValue) {
    match value {
        FieldValue::Uuid(value) => builder.push_bind(value),
        FieldValue::Uuids(values) => builder.push_bind(values),
        FieldValue::Text(value) => builder.push_bind(value),
        FieldValue::Int(value) => builder.push_bind(value),
        FieldValue::Decimal(value) => builder.push_bind(value),
        FieldValue::Bool(value) => builder.push_bind(value),
        FieldValue::Timestamp(value) => builder.push_bind(SqlxTimestamp::from(value)),
    };
}

#[cfg(test)]
mod tests {
    use sqlx::{FromRow, Row, postgres::PgRow, query_builder::Separated};

    use crate::storage::filter::Direction;

    use super::*;

    #[derive(Debug)]
    struct Widget {
        id: Uuid,
        name: String,
    }

    impl<'r> FromRow<'r, PgRow> for Widget {
        fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
            Ok(Self {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            })
        }
    }

    impl Entity for Widget {
        const TABLE: &'static str = "ecom.widgets";
        const COLUMNS: &'static [&'static str] = &["id", "name"];
        const SOFT_DELETE_COLUMN: Option<&'static str> = Some("deleted_at");

        fn id(&self) -> Uuid {
            self.id
        }

        fn push_values(&self, values: &mut Separated<'_, 'static, Postgres, &'static str>) {
            values.push_bind(self.id);
            values.push_bind(self.name.clone());
        }
    }

    #[derive(Debug)]
    struct Ledger {
        id: Uuid,
    }

    impl<'r> FromRow<'r, PgRow> for Ledger {
        fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
            Ok(Self {
                id: row.try_get("id")?,
            })
        }
    }

    impl Entity for Ledger {
        const TABLE: &'static str = "ecom.ledgers";
        const COLUMNS: &'static [&'static str] = &["id"];

        fn id(&self) -> Uuid {
            self.id
        }

        fn push_values(&self, values: &mut Separated<'_, 'static, Postgres, &'static str>) {
            values.push_bind(self.id);
        }
    }

    fn widget() -> Widget {
        Widget {
            id: Uuid::nil(),
            name: "lamp".to_string(),
        }
    }

    #[test]
    fn select_without_filter_excludes_deleted_rows() -> Result<(), StorageError> {
        let builder = select::<Widget>(&Filter::default())?;

        assert_eq!(
            builder.sql(),
            "SELECT * FROM ecom.widgets WHERE deleted_at IS NULL"
        );

        Ok(())
    }

    #[test]
    fn select_without_soft_delete_has_no_where_clause() -> Result<(), StorageError> {
        let builder = select::<Ledger>(&Filter::default())?;

        assert_eq!(builder.sql(), "SELECT * FROM ecom.ledgers");

        Ok(())
    }

    #[test]
    fn select_for_update_locks_ordered_batch() -> Result<(), StorageError> {
        let filter = Filter::new()
            .where_in("id", [Uuid::nil()])
            .order_by("id", Direction::Asc)
            .for_update();

        let builder = select::<Widget>(&filter)?;

        assert_eq!(
            builder.sql(),
            "SELECT * FROM ecom.widgets WHERE deleted_at IS NULL AND id = ANY($1) ORDER BY id ASC FOR UPDATE"
        );

        Ok(())
    }

    #[test]
    fn select_combines_conditions_ordering_and_paging() -> Result<(), StorageError> {
        let filter = Filter::new()
            .where_eq("name", "lamp")
            .where_not_null("updated_at")
            .order_by("name", Direction::Asc)
            .order_by("created_at", Direction::Desc)
            .limit(10)
            .offset(20)
            .with_deleted();

        let builder = select::<Widget>(&filter)?;

        assert_eq!(
            builder.sql(),
            "SELECT * FROM ecom.widgets WHERE name = $1 AND updated_at IS NOT NULL ORDER BY name ASC, created_at DESC LIMIT $2 OFFSET $3"
        );

        Ok(())
    }

    #[test]
    fn select_rejects_unknown_columns() {
        let result = select::<Widget>(&Filter::new().where_eq("name; DROP TABLE users", "x"));

        assert!(
            matches!(result, Err(StorageError::UnknownColumn(_))),
            "expected UnknownColumn"
        );
    }

    #[test]
    fn insert_binds_every_writable_column() {
        let builder = insert(&widget());

        assert_eq!(
            builder.sql(),
            "INSERT INTO ecom.widgets (id, name) VALUES ($1, $2)"
        );
    }

    #[test]
    fn upsert_replaces_every_column_but_the_key() {
        let builder = upsert(&widget());

        assert_eq!(
            builder.sql(),
            "INSERT INTO ecom.widgets (id, name) VALUES ($1, $2) ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, updated_at = now()"
        );
    }

    #[test]
    fn delete_is_soft_when_entity_has_deletion_column() {
        let builder = delete::<Widget>(Uuid::nil());

        assert_eq!(
            builder.sql(),
            "UPDATE ecom.widgets SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL"
        );
    }

    #[test]
    fn delete_is_hard_otherwise() {
        let builder = delete::<Ledger>(Uuid::nil());

        assert_eq!(builder.sql(), "DELETE FROM ecom.ledgers WHERE id = $1");
    }
}
