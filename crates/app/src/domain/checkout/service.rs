//! Checkout service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use tracing::info;

use crate::{
    domain::{
        checkout::{
            data::{Cart, CartLine, CheckoutReceipt},
            errors::CheckoutError,
        },
        orders::records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderStatus, OrderUuid},
        products::records::{ProductRecord, ProductUuid},
        users::records::UserUuid,
    },
    storage::{Direction, Filter},
    unit_of_work::{PgUnitOfWork, Repositories},
};

#[derive(Debug, Clone)]
pub struct PgCheckoutService {
    uow: PgUnitOfWork,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(uow: PgUnitOfWork) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    async fn checkout(&self, user: UserUuid, cart: Cart) -> Result<CheckoutReceipt, CheckoutError> {
        let lines = cart.lines()?;
        let address = cart.delivery_address();

        let receipt = self
            .uow
            .run(move |repos| Box::pin(place_order(repos, user, lines, address)))
            .await?;

        info!(
            order_uuid = %receipt.order,
            user_uuid = %user,
            total = %receipt.total,
            "placed order"
        );

        Ok(receipt)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Reserve stock for every cart line and create a pending order, atomically.
    async fn checkout(&self, user: UserUuid, cart: Cart) -> Result<CheckoutReceipt, CheckoutError>;
}

/// A cart line matched against the locked product row it draws stock from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PricedLine {
    pub product: ProductRecord,
    pub quantity: i32,
}

async fn place_order(
    repos: &mut Repositories,
    user: UserUuid,
    lines: Vec<CartLine>,
    address: Option<String>,
) -> Result<CheckoutReceipt, CheckoutError> {
    let filter = Filter::new()
        .where_in("id", lines.iter().map(|line| line.product))
        .order_by("id", Direction::Asc)
        .for_update();

    let snapshot = repos
        .products()
        .get_all(&filter)
        .await?
        .into_iter()
        .map(|product| (product.uuid, product))
        .collect::<FxHashMap<_, _>>();

    let priced = check_stock(&lines, snapshot)?;
    let total = order_total(&priced)?;

    for line in &priced {
        let mut product = line.product.clone();

        product.quantity -= line.quantity;

        repos.products().update(&product).await?;
    }

    let now = Timestamp::now();

    let order = repos
        .orders()
        .create(&OrderRecord {
            uuid: OrderUuid::new(),
            user_uuid: user,
            total,
            status: OrderStatus::Pending,
            address,
            created_at: now,
            updated_at: now,
        })
        .await?;

    for line in &priced {
        repos
            .order_items()
            .create(&OrderItemRecord {
                uuid: OrderItemUuid::new(),
                order_uuid: order.uuid,
                product_uuid: line.product.uuid,
                quantity: line.quantity,
                price: line.product.price,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }

    Ok(CheckoutReceipt {
        order: order.uuid,
        total: order.total,
    })
}

/// Pair every line with its product, failing on the first missing product or short stock.
pub(crate) fn check_stock(
    lines: &[CartLine],
    mut snapshot: FxHashMap<ProductUuid, ProductRecord>,
) -> Result<Vec<PricedLine>, CheckoutError> {
    lines
        .iter()
        .map(|line| {
            let product = snapshot
                .remove(&line.product)
                .ok_or(CheckoutError::ProductNotFound(line.product))?;

            if product.quantity < line.quantity {
                return Err(CheckoutError::OutOfStock(line.product));
            }

            Ok(PricedLine {
                product,
                quantity: line.quantity,
            })
        })
        .collect()
}

/// Largest total `ecom.orders.total` (`NUMERIC(14, 2)`) can store.
pub(crate) const MAX_ORDER_TOTAL: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Sum of unit price times quantity over every line.
///
/// Totals the orders table cannot store are rejected as [`CheckoutError::TotalOverflow`].
pub(crate) fn order_total(lines: &[PricedLine]) -> Result<Decimal, CheckoutError> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |total, line| {
            line.product
                .price
                .checked_mul(Decimal::from(line.quantity))
                .and_then(|subtotal| total.checked_add(subtotal))
        })
        .filter(|total| *total <= MAX_ORDER_TOTAL)
        .ok_or(CheckoutError::TotalOverflow)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{checkout::data::CartItem, products::ProductsService},
        storage::StorageError,
        test::{
            TestContext,
            helpers::{insert_product, insert_user, product_record},
        },
    };

    use super::*;

    fn cart(items: &[(ProductUuid, i32)]) -> Cart {
        Cart {
            items: items
                .iter()
                .map(|&(product, quantity)| CartItem { product, quantity })
                .collect(),
            address: Some("1 Main St".to_string()),
        }
    }

    fn snapshot(products: &[ProductRecord]) -> FxHashMap<ProductUuid, ProductRecord> {
        products
            .iter()
            .map(|product| (product.uuid, product.clone()))
            .collect()
    }

    async fn stock_of(ctx: &TestContext, product: ProductUuid) -> Result<i32, StorageError> {
        ctx.uow
            .run(move |repos| {
                Box::pin(async move {
                    Ok(repos.products().get_by_id(product, false).await?.quantity)
                })
            })
            .await
    }

    async fn order_count(ctx: &TestContext) -> Result<usize, StorageError> {
        ctx.uow
            .run(|repos| {
                Box::pin(async move { Ok(repos.orders().get_all(&Filter::new()).await?.len()) })
            })
            .await
    }

    #[test]
    fn check_stock_rejects_missing_products() {
        let missing = ProductUuid::new();
        let lines = [CartLine {
            product: missing,
            quantity: 1,
        }];

        let result = check_stock(&lines, FxHashMap::default());

        assert!(
            matches!(result, Err(CheckoutError::ProductNotFound(p)) if p == missing),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[test]
    fn check_stock_rejects_short_stock() {
        let product = product_record(ProductUuid::new(), "Kettle", Decimal::ONE, 1);
        let lines = [CartLine {
            product: product.uuid,
            quantity: 2,
        }];

        let result = check_stock(&lines, snapshot(&[product.clone()]));

        assert!(
            matches!(result, Err(CheckoutError::OutOfStock(p)) if p == product.uuid),
            "expected OutOfStock, got {result:?}"
        );
    }

    #[test]
    fn check_stock_accepts_exact_stock() -> Result<(), CheckoutError> {
        let product = product_record(ProductUuid::new(), "Kettle", Decimal::ONE, 2);
        let lines = [CartLine {
            product: product.uuid,
            quantity: 2,
        }];

        let priced = check_stock(&lines, snapshot(&[product.clone()]))?;

        assert_eq!(
            priced,
            vec![PricedLine {
                product,
                quantity: 2
            }]
        );

        Ok(())
    }

    #[test]
    fn order_total_sums_price_times_quantity() -> Result<(), CheckoutError> {
        let lines = [
            PricedLine {
                product: product_record(ProductUuid::new(), "Kettle", Decimal::new(1050, 2), 9),
                quantity: 2,
            },
            PricedLine {
                product: product_record(ProductUuid::new(), "Mug", Decimal::new(333, 2), 9),
                quantity: 3,
            },
        ];

        assert_eq!(order_total(&lines)?, Decimal::new(3099, 2));

        Ok(())
    }

    #[test]
    fn order_total_reports_overflow() {
        let lines = [PricedLine {
            product: product_record(ProductUuid::new(), "Yacht", Decimal::MAX, 9),
            quantity: 2,
        }];

        let result = order_total(&lines);

        assert!(
            matches!(result, Err(CheckoutError::TotalOverflow)),
            "expected TotalOverflow, got {result:?}"
        );
    }

    #[test]
    fn order_total_is_bounded_by_the_orders_column() -> Result<(), CheckoutError> {
        let dearest = Decimal::new(999_999_999_999, 2);
        let line = |quantity| PricedLine {
            product: product_record(ProductUuid::new(), "Yacht", dearest, 500),
            quantity,
        };

        assert_eq!(MAX_ORDER_TOTAL, Decimal::new(99_999_999_999_999, 2));
        assert_eq!(order_total(&[line(100)])?, Decimal::new(99_999_999_999_900, 2));

        let result = order_total(&[line(101)]);

        assert!(
            matches!(result, Err(CheckoutError::TotalOverflow)),
            "expected TotalOverflow, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn checkout_total_beyond_order_column_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let user = insert_user(&ctx, "buyer@example.com").await;
        let yacht = insert_product(&ctx, "Yacht", Decimal::new(999_999_999_999, 2), 500).await;

        let result = ctx.checkout.checkout(user, cart(&[(yacht, 101)])).await;

        assert!(
            matches!(result, Err(CheckoutError::TotalOverflow)),
            "expected TotalOverflow, got {result:?}"
        );
        assert_eq!(stock_of(&ctx, yacht).await?, 500);
        assert_eq!(order_count(&ctx).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_decrements_stock_and_creates_pending_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = insert_user(&ctx, "buyer@example.com").await;
        let product = insert_product(&ctx, "Kettle", Decimal::new(10, 0), 5).await;

        let receipt = ctx.checkout.checkout(user, cart(&[(product, 2)])).await?;

        assert_eq!(receipt.total, Decimal::new(20, 0));
        assert_eq!(stock_of(&ctx, product).await?, 3);

        let order = receipt.order;

        let (stored, items) = ctx
            .uow
            .run(move |repos| {
                Box::pin(async move {
                    let stored = repos.orders().get_by_id(order, false).await?;
                    let items = repos
                        .order_items()
                        .get_all(&Filter::new().where_eq("order_id", order))
                        .await?;

                    Ok::<_, StorageError>((stored, items))
                })
            })
            .await?;

        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(stored.user_uuid, user);
        assert_eq!(stored.total, receipt.total);
        assert_eq!(stored.address.as_deref(), Some("1 Main St"));
        assert_eq!(items.len(), 1, "expected one order line");
        assert_eq!(items[0].product_uuid, product);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].price, Decimal::new(10, 0));

        Ok(())
    }

    #[tokio::test]
    async fn checkout_merges_repeated_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let user = insert_user(&ctx, "buyer@example.com").await;
        let product = insert_product(&ctx, "Mug", Decimal::new(450, 2), 5).await;

        let receipt = ctx
            .checkout
            .checkout(user, cart(&[(product, 1), (product, 3)]))
            .await?;

        assert_eq!(receipt.total, Decimal::new(1800, 2));
        assert_eq!(stock_of(&ctx, product).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_out_of_stock_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let user = insert_user(&ctx, "buyer@example.com").await;
        let plenty = insert_product(&ctx, "Mug", Decimal::ONE, 10).await;
        let scarce = insert_product(&ctx, "Kettle", Decimal::ONE, 0).await;

        let result = ctx
            .checkout
            .checkout(user, cart(&[(plenty, 2), (scarce, 1)]))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::OutOfStock(p)) if p == scarce),
            "expected OutOfStock, got {result:?}"
        );
        assert_eq!(stock_of(&ctx, plenty).await?, 10, "no partial checkout");
        assert_eq!(order_count(&ctx).await?, 0, "no order on failure");

        Ok(())
    }

    #[tokio::test]
    async fn checkout_unknown_product_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let user = insert_user(&ctx, "buyer@example.com").await;
        let known = insert_product(&ctx, "Mug", Decimal::ONE, 10).await;
        let unknown = ProductUuid::new();

        let result = ctx
            .checkout
            .checkout(user, cart(&[(known, 1), (unknown, 1)]))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::ProductNotFound(p)) if p == unknown),
            "expected ProductNotFound, got {result:?}"
        );
        assert_eq!(stock_of(&ctx, known).await?, 10);
        assert_eq!(order_count(&ctx).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_invalid_quantity_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let user = insert_user(&ctx, "buyer@example.com").await;
        let product = insert_product(&ctx, "Mug", Decimal::ONE, 10).await;

        let result = ctx
            .checkout
            .checkout(user, cart(&[(product, 1), (product, 0)]))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::InvalidQuantity { .. })),
            "expected InvalidQuantity, got {result:?}"
        );
        assert_eq!(stock_of(&ctx, product).await?, 10);
        assert_eq!(order_count(&ctx).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_empty_cart_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = insert_user(&ctx, "buyer@example.com").await;

        let result = ctx.checkout.checkout(user, Cart::default()).await;

        assert!(
            matches!(result, Err(CheckoutError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
        assert_eq!(order_count(&ctx).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_ignores_deleted_products() -> TestResult {
        let ctx = TestContext::new().await;
        let user = insert_user(&ctx, "buyer@example.com").await;
        let product = insert_product(&ctx, "Mug", Decimal::ONE, 10).await;

        ctx.products.delete_product(product).await?;

        let result = ctx.checkout.checkout(user, cart(&[(product, 1)])).await;

        assert!(
            matches!(result, Err(CheckoutError::ProductNotFound(_))),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_sell_the_last_unit_once() -> TestResult {
        let ctx = TestContext::new().await;
        let first_user = insert_user(&ctx, "first@example.com").await;
        let second_user = insert_user(&ctx, "second@example.com").await;
        let product = insert_product(&ctx, "Last Kettle", Decimal::new(30, 0), 1).await;

        let (first, second) = tokio::join!(
            ctx.checkout.checkout(first_user, cart(&[(product, 1)])),
            ctx.checkout.checkout(second_user, cart(&[(product, 1)])),
        );

        let outcomes = [&first, &second];

        assert_eq!(
            outcomes.iter().filter(|outcome| outcome.is_ok()).count(),
            1,
            "exactly one checkout must succeed: {first:?} / {second:?}"
        );
        assert!(
            outcomes
                .iter()
                .any(|outcome| matches!(outcome, Err(CheckoutError::OutOfStock(_)))),
            "the losing checkout must see the stock check fail: {first:?} / {second:?}"
        );
        assert_eq!(stock_of(&ctx, product).await?, 0);
        assert_eq!(order_count(&ctx).await?, 1);

        Ok(())
    }
}
