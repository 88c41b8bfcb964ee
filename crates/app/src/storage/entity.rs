//! Persisted entity contract.

use sqlx::{FromRow, Postgres, postgres::PgRow, query_builder::Separated};
use uuid::Uuid;

/// Columns every table carries that are maintained by the database.
const TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// A record stored in one table and identified by a UUID primary key.
///
/// `created_at` and `updated_at` are assigned by the database, so they are never part of
/// [`Entity::COLUMNS`]; timestamps on a record that has not been written yet are provisional
/// and replaced by the row returned from storage.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    /// Schema-qualified table name.
    const TABLE: &'static str;

    /// Writable columns, primary key first.
    const COLUMNS: &'static [&'static str];

    /// Nullable timestamp column that marks the row as deleted.
    const SOFT_DELETE_COLUMN: Option<&'static str> = None;

    /// Primary key.
    fn id(&self) -> Uuid;

    /// Push one bound value per entry of [`Entity::COLUMNS`], in the same order.
    fn push_values(&self, values: &mut Separated<'_, 'static, Postgres, &'static str>);

    /// Whether `column` may appear in a filter or ordering for this entity.
    fn has_column(column: &str) -> bool {
        Self::COLUMNS.contains(&column)
            || TIMESTAMP_COLUMNS.contains(&column)
            || Self::SOFT_DELETE_COLUMN == Some(column)
    }
}
