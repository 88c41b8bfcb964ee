//! Test Helpers

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{
        products::records::{ProductRecord, ProductUuid},
        users::records::{UserRecord, UserUuid},
    },
    test::TestContext,
};

/// An unsaved product with empty description and image.
pub(crate) fn product_record(
    uuid: ProductUuid,
    name: &str,
    price: Decimal,
    quantity: i32,
) -> ProductRecord {
    let now = Timestamp::now();

    ProductRecord {
        uuid,
        name: name.to_string(),
        description: String::new(),
        image: String::new(),
        price,
        quantity,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub(crate) async fn insert_product(
    ctx: &TestContext,
    name: &str,
    price: Decimal,
    quantity: i32,
) -> ProductUuid {
    let record = product_record(ProductUuid::new(), name, price, quantity);

    ctx.uow
        .run(move |repos| {
            Box::pin(async move { repos.products().create(&record).await.map(|p| p.uuid) })
        })
        .await
        .expect("Failed to insert test product")
}

/// Insert a user directly, skipping password hashing.
pub(crate) async fn insert_user(ctx: &TestContext, email: &str) -> UserUuid {
    let now = Timestamp::now();
    let record = UserRecord {
        uuid: UserUuid::new(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        created_at: now,
        updated_at: now,
    };

    ctx.uow
        .run(move |repos| {
            Box::pin(async move { repos.users().create(&record).await.map(|u| u.uuid) })
        })
        .await
        .expect("Failed to insert test user")
}
