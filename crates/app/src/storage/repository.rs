//! Generic Repository

use std::marker::PhantomData;

use sqlx::PgConnection;
use uuid::Uuid;

use super::{
    entity::Entity,
    errors::StorageError,
    filter::{Direction, FieldValue, Filter},
    query,
};

/// CRUD operations for one entity type, bound to a borrowed connection.
///
/// Inside a unit of work the connection is the open transaction, so every repository handed
/// out for that unit shares its isolation and its fate on commit or rollback.
#[derive(Debug)]
pub struct PgRepository<'c, T> {
    conn: &'c mut PgConnection,
    entity: PhantomData<fn() -> T>,
}

impl<'c, T: Entity> PgRepository<'c, T> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self {
            conn,
            entity: PhantomData,
        }
    }

    /// Fetch every row matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnknownColumn`] for columns the entity does not have, or the
    /// translated database error.
    pub async fn get_all(&mut self, filter: &Filter) -> Result<Vec<T>, StorageError> {
        let mut builder = query::select::<T>(filter)?;

        Ok(builder
            .build_query_as::<T>()
            .fetch_all(&mut *self.conn)
            .await?)
    }

    /// Fetch one row by primary key, optionally locking it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when no live row has this key.
    pub async fn get_by_id(
        &mut self,
        id: impl Into<Uuid>,
        for_update: bool,
    ) -> Result<T, StorageError> {
        let filter = lock_if(Filter::new().where_eq("id", id.into()), for_update);

        self.get_one(&filter).await
    }

    /// Fetch the first row, by primary key, whose columns equal every given value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when nothing matches and
    /// [`StorageError::MissingRequiredData`] when `fields` is empty.
    pub async fn get_by_fields(
        &mut self,
        fields: &[(&'static str, FieldValue)],
        for_update: bool,
    ) -> Result<T, StorageError> {
        if fields.is_empty() {
            return Err(StorageError::MissingRequiredData);
        }

        let filter = fields
            .iter()
            .cloned()
            .fold(Filter::new(), |filter, (column, value)| {
                filter.where_eq(column, value)
            })
            .order_by("id", Direction::Asc)
            .limit(1);

        self.get_one(&lock_if(filter, for_update)).await
    }

    /// Insert a new row. Never overwrites an existing one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DuplicateKey`] when a unique constraint is violated.
    pub async fn create(&mut self, entity: &T) -> Result<T, StorageError> {
        let mut builder = query::insert(entity);

        builder.push(" RETURNING *");

        Ok(builder
            .build_query_as::<T>()
            .fetch_one(&mut *self.conn)
            .await?)
    }

    /// Replace the row with this primary key, inserting it when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns the translated database error.
    pub async fn update(&mut self, entity: &T) -> Result<T, StorageError> {
        let mut builder = query::upsert(entity);

        builder.push(" RETURNING *");

        Ok(builder
            .build_query_as::<T>()
            .fetch_one(&mut *self.conn)
            .await?)
    }

    /// Remove the row, or stamp its deletion column for soft-deletable entities.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when no live row has this key.
    pub async fn delete(&mut self, entity: &T) -> Result<(), StorageError> {
        let rows_affected = query::delete::<T>(entity.id())
            .build()
            .execute(&mut *self.conn)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn get_one(&mut self, filter: &Filter) -> Result<T, StorageError> {
        let mut builder = query::select::<T>(filter)?;

        builder
            .build_query_as::<T>()
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::NotFound)
    }
}

fn lock_if(filter: Filter, for_update: bool) -> Filter {
    if for_update {
        filter.for_update()
    } else {
        filter
    }
}
