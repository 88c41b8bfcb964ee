//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ecom_app::domain::products::records::ProductRecord;

use crate::{
    extensions::*, money::to_json_number, products::errors::into_status_error, state::State,
};

/// Catalogue entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: String,

    /// Unit price
    pub price: f64,

    /// Units in stock
    pub quantity: i32,

    pub created_at: String,
    pub updated_at: String,
}

impl ProductResponse {
    pub(crate) fn from_record(product: ProductRecord) -> Result<Self, StatusError> {
        Ok(Self {
            id: product.uuid.into(),
            price: to_json_number(product.price)?,
            name: product.name,
            description: product.description,
            image: product.image,
            quantity: product.quantity,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        })
    }
}

/// Get Product Handler
///
/// Returns a single live product.
#[endpoint(tags("products"), summary = "Get Product")]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .get_product(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductResponse::from_record(product)?))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use ecom_app::domain::products::{
        MockProductsService, ProductsServiceError, records::ProductUuid,
    };

    use crate::test_helpers::{make_product, products_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        products_service(products, Router::with_path("products/{product}").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_product() -> TestResult {
        let uuid = ProductUuid::new();
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(make_product(uuid, "Kettle", Decimal::new(2499, 2))));

        products.expect_list_products().never();
        products.expect_create_product().never();
        products.expect_delete_product().never();

        let mut res = TestClient::get(format!("http://example.com/products/{uuid}"))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let product: ProductResponse = res.take_json().await?;

        assert_eq!(product.id, uuid.into_uuid());
        assert_eq!(product.name, "Kettle");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_product_returns_404() {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        products.expect_list_products().never();
        products.expect_create_product().never();
        products.expect_delete_product().never();

        let res = TestClient::get(format!("http://example.com/products/{}", ProductUuid::new()))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_get_malformed_uuid_skips_service() {
        let mut products = MockProductsService::new();

        products.expect_get_product().never();
        products.expect_list_products().never();
        products.expect_create_product().never();
        products.expect_delete_product().never();

        let res = TestClient::get("http://example.com/products/not-a-uuid")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
