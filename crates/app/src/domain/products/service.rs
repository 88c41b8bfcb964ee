//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::products::{
        data::NewProduct,
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid},
    },
    storage::{Direction, Filter, StorageError},
    unit_of_work::{PgUnitOfWork, Repositories},
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    uow: PgUnitOfWork,
}

impl PgProductsService {
    #[must_use]
    pub fn new(uow: PgUnitOfWork) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let filter = Filter::new()
            .order_by("name", Direction::Asc)
            .order_by("id", Direction::Asc);

        self.uow
            .run(move |repos| Box::pin(async move { repos.products().get_all(&filter).await }))
            .await
            .map_err(ProductsServiceError::from)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        self.uow
            .run(move |repos| {
                Box::pin(async move { repos.products().get_by_id(product, false).await })
            })
            .await
            .map_err(ProductsServiceError::from)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let record = product.into_record()?;

        self.uow
            .run(move |repos| Box::pin(async move { repos.products().create(&record).await }))
            .await
            .map_err(ProductsServiceError::from)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        self.uow
            .run(move |repos| Box::pin(delete_live_product(repos, product)))
            .await
            .map_err(ProductsServiceError::from)
    }
}

async fn delete_live_product(
    repos: &mut Repositories,
    product: ProductUuid,
) -> Result<(), StorageError> {
    let record = repos.products().get_by_id(product, true).await?;

    repos.products().delete(&record).await
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all live products, ordered by name.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft-deletes a product so it no longer appears in listings or checkouts.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}
