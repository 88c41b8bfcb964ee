use clap::Args;
use ecom_app::domain::products::{ProductsService, records::ProductUuid};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct DeleteProductArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// UUID of the product to retire
    #[arg(long)]
    uuid: Uuid,
}

pub(crate) async fn run(args: DeleteProductArgs) -> Result<(), String> {
    let service = args.database.products_service().await?;

    service
        .delete_product(ProductUuid::from_uuid(args.uuid))
        .await
        .map_err(|error| format!("failed to delete product: {error}"))?;

    println!("deleted product {}", args.uuid);

    Ok(())
}
