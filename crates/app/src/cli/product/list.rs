use clap::Args;
use ecom_app::domain::products::ProductsService;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct ListProductsArgs {
    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: ListProductsArgs) -> Result<(), String> {
    let service = args.database.products_service().await?;

    let products = service
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    for product in products {
        println!(
            "{}\t{}\t{}\t{}",
            product.uuid, product.price, product.quantity, product.name
        );
    }

    Ok(())
}
