//! Unit of Work
//!
//! [`PgUnitOfWork::run`] executes one workflow inside one transaction. The workflow receives a
//! [`Repositories`] bundle whose repositories are all bound to that transaction; the unit commits
//! when the workflow succeeds and rolls back when it fails, times out, or is dropped.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    time::Duration,
};

use futures::future::BoxFuture;
use sqlx::{Postgres, Transaction};
use tokio::time::timeout;
use tracing::warn;

use crate::{
    database::Db,
    domain::{
        orders::records::{OrderItemRecord, OrderRecord},
        products::records::ProductRecord,
        users::records::UserRecord,
    },
    storage::{PgRepository, StorageError},
};

/// Transaction-scoped repository factory.
///
/// Each accessor hands out a fresh repository that borrows the unit's transaction.
pub struct Repositories {
    tx: Transaction<'static, Postgres>,
}

impl Repositories {
    pub fn products(&mut self) -> PgRepository<'_, ProductRecord> {
        PgRepository::new(&mut *self.tx)
    }

    pub fn orders(&mut self) -> PgRepository<'_, OrderRecord> {
        PgRepository::new(&mut *self.tx)
    }

    pub fn order_items(&mut self) -> PgRepository<'_, OrderItemRecord> {
        PgRepository::new(&mut *self.tx)
    }

    pub fn users(&mut self) -> PgRepository<'_, UserRecord> {
        PgRepository::new(&mut *self.tx)
    }
}

impl Debug for Repositories {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct PgUnitOfWork {
    db: Db,
    deadline: Option<Duration>,
}

impl PgUnitOfWork {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db, deadline: None }
    }

    /// Roll back any workflow that has not finished within `deadline`.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Run `workflow` once in a new transaction.
    ///
    /// The transaction commits when the workflow returns `Ok` and rolls back when it returns
    /// `Err`. Workflows must not start another unit of work.
    ///
    /// # Errors
    ///
    /// Returns the workflow's own error, [`StorageError::TimedOut`] when the deadline passes,
    /// or the storage error raised while beginning or committing the transaction.
    pub async fn run<T, E, F>(&self, workflow: F) -> Result<T, E>
    where
        F: for<'r> FnOnce(&'r mut Repositories) -> BoxFuture<'r, Result<T, E>> + Send,
        T: Send,
        E: From<StorageError> + Send,
    {
        let tx = self.db.begin().await.map_err(StorageError::from)?;

        let mut repositories = Repositories { tx };

        let outcome = match self.deadline {
            Some(deadline) => timeout(deadline, workflow(&mut repositories))
                .await
                .unwrap_or_else(|_elapsed| Err(StorageError::TimedOut.into())),
            None => workflow(&mut repositories).await,
        };

        let Repositories { tx } = repositories;

        match outcome {
            Ok(value) => {
                tx.commit().await.map_err(StorageError::from)?;

                Ok(value)
            }
            Err(error) => {
                if let Err(source) = tx.rollback().await {
                    warn!("failed to roll back transaction: {source}");
                }

                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;
    use tokio::time::sleep;

    use crate::{
        domain::products::records::ProductUuid,
        storage::Filter,
        test::{
            TestContext,
            helpers::{insert_product, product_record},
        },
    };

    use super::*;

    #[tokio::test]
    async fn run_commits_when_workflow_succeeds() -> TestResult {
        let ctx = TestContext::new().await;
        let product = insert_product(&ctx, "Kettle", Decimal::new(2500, 2), 4).await;

        ctx.uow
            .run(move |repos| {
                Box::pin(async move {
                    let mut record = repos.products().get_by_id(product, true).await?;

                    record.quantity = 1;

                    repos.products().update(&record).await?;

                    Ok::<_, StorageError>(())
                })
            })
            .await?;

        let stored = ctx
            .uow
            .run(move |repos| Box::pin(async move { repos.products().get_by_id(product, false).await }))
            .await?;

        assert_eq!(stored.quantity, 1, "committed update must be visible");

        Ok(())
    }

    #[tokio::test]
    async fn run_rolls_back_when_workflow_fails() -> TestResult {
        let ctx = TestContext::new().await;
        let product = insert_product(&ctx, "Kettle", Decimal::new(2500, 2), 4).await;

        let result = ctx
            .uow
            .run(move |repos| {
                Box::pin(async move {
                    let mut record = repos.products().get_by_id(product, true).await?;

                    record.quantity = 0;

                    repos.products().update(&record).await?;

                    Err::<(), _>(StorageError::InvalidData)
                })
            })
            .await;

        assert!(
            matches!(result, Err(StorageError::InvalidData)),
            "expected the workflow's own error, got {result:?}"
        );

        let stored = ctx
            .uow
            .run(move |repos| Box::pin(async move { repos.products().get_by_id(product, false).await }))
            .await?;

        assert_eq!(stored.quantity, 4, "failed workflow must not persist writes");

        Ok(())
    }

    #[tokio::test]
    async fn run_rolls_back_when_deadline_passes() -> TestResult {
        let ctx = TestContext::new().await;
        let product = insert_product(&ctx, "Kettle", Decimal::new(2500, 2), 4).await;
        let uow = ctx.uow.clone().with_deadline(Duration::from_millis(50));

        let result = uow
            .run(move |repos| {
                Box::pin(async move {
                    let mut record = repos.products().get_by_id(product, true).await?;

                    record.quantity = 0;

                    repos.products().update(&record).await?;

                    sleep(Duration::from_secs(5)).await;

                    Ok::<_, StorageError>(())
                })
            })
            .await;

        assert!(
            matches!(result, Err(StorageError::TimedOut)),
            "expected TimedOut, got {result:?}"
        );

        let stored = ctx
            .uow
            .run(move |repos| Box::pin(async move { repos.products().get_by_id(product, false).await }))
            .await?;

        assert_eq!(stored.quantity, 4, "timed out workflow must not persist writes");

        Ok(())
    }

    #[tokio::test]
    async fn repositories_share_one_transaction() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ProductUuid::new();

        let seen = ctx
            .uow
            .run(move |repos| {
                Box::pin(async move {
                    let record = product_record(product, "Teapot", Decimal::ONE, 1);

                    let mut record = repos.products().create(&record).await?;

                    record.name = "Renamed".to_string();

                    repos.products().update(&record).await?;

                    let all = repos
                        .products()
                        .get_all(&Filter::new().where_eq("name", "Renamed"))
                        .await?;

                    Ok::<_, StorageError>(all.len())
                })
            })
            .await?;

        assert_eq!(seen, 1, "writes must be visible to later repositories in the unit");

        Ok(())
    }
}
