//! Composable query modifiers for [`PgRepository::get_all`](super::PgRepository::get_all).

use jiff::Timestamp;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::uuids::TypedUuid;

/// A value bound into a filter condition.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Uuid(Uuid),
    Uuids(Vec<Uuid>),
    Text(String),
    Int(i64),
    Decimal(Decimal),
    Bool(bool),
    Timestamp(Timestamp),
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl<T> From<TypedUuid<T>> for FieldValue {
    fn from(value: TypedUuid<T>) -> Self {
        Self::Uuid(value.into_uuid())
    }
}

impl From<Vec<Uuid>> for FieldValue {
    fn from(value: Vec<Uuid>) -> Self {
        Self::Uuids(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    IsNull,
    IsNotNull,
}

impl Op {
    pub(crate) const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => " = ",
            Self::Ne => " <> ",
            Self::Gt => " > ",
            Self::Gte => " >= ",
            Self::Lt => " < ",
            Self::Lte => " <= ",
            Self::In => " = ANY(",
            Self::IsNull => " IS NULL",
            Self::IsNotNull => " IS NOT NULL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: &'static str,
    pub op: Op,
    pub value: Option<FieldValue>,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub(crate) const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => " ASC",
            Self::Desc => " DESC",
        }
    }
}

/// Conditions, ordering, paging and locking for a multi-row read.
///
/// `Filter::default()` matches every live row in storage order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
    ordering: Vec<(&'static str, Direction)>,
    limit: Option<u32>,
    offset: Option<u32>,
    with_deleted: bool,
    for_update: bool,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn where_eq(self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        self.condition(column, Op::Eq, Some(value.into()))
    }

    #[must_use]
    pub fn where_ne(self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        self.condition(column, Op::Ne, Some(value.into()))
    }

    #[must_use]
    pub fn where_gt(self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        self.condition(column, Op::Gt, Some(value.into()))
    }

    #[must_use]
    pub fn where_gte(self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        self.condition(column, Op::Gte, Some(value.into()))
    }

    #[must_use]
    pub fn where_lt(self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        self.condition(column, Op::Lt, Some(value.into()))
    }

    #[must_use]
    pub fn where_lte(self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        self.condition(column, Op::Lte, Some(value.into()))
    }

    /// Match rows whose `column` is any of `ids`.
    #[must_use]
    pub fn where_in<I>(self, column: &'static str, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Uuid>,
    {
        let ids = ids.into_iter().map(Into::into).collect::<Vec<Uuid>>();

        self.condition(column, Op::In, Some(FieldValue::Uuids(ids)))
    }

    #[must_use]
    pub fn where_null(self, column: &'static str) -> Self {
        self.condition(column, Op::IsNull, None)
    }

    #[must_use]
    pub fn where_not_null(self, column: &'static str) -> Self {
        self.condition(column, Op::IsNotNull, None)
    }

    #[must_use]
    pub fn order_by(mut self, column: &'static str, direction: Direction) -> Self {
        self.ordering.push((column, direction));
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Include soft-deleted rows.
    #[must_use]
    pub const fn with_deleted(mut self) -> Self {
        self.with_deleted = true;
        self
    }

    /// Lock every returned row until the enclosing transaction ends.
    #[must_use]
    pub const fn for_update(mut self) -> Self {
        self.for_update = true;
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn ordering(&self) -> &[(&'static str, Direction)] {
        &self.ordering
    }

    pub const fn get_limit(&self) -> Option<u32> {
        self.limit
    }

    pub const fn get_offset(&self) -> Option<u32> {
        self.offset
    }

    pub const fn includes_deleted(&self) -> bool {
        self.with_deleted
    }

    pub const fn locks_rows(&self) -> bool {
        self.for_update
    }

    /// Every column the filter refers to.
    pub(crate) fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.conditions
            .iter()
            .map(|condition| condition.column)
            .chain(self.ordering.iter().map(|(column, _)| *column))
    }

    fn condition(mut self, column: &'static str, op: Op, value: Option<FieldValue>) -> Self {
        self.conditions.push(Condition { column, op, value });
        self
    }
}
