use clap::Args;
use ecom_app::domain::products::{
    ProductsService,
    data::NewProduct,
    records::ProductUuid,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Product display name
    #[arg(long)]
    name: String,

    /// Unit price, e.g. 19.99
    #[arg(long)]
    price: Decimal,

    /// Units in stock
    #[arg(long, default_value_t = 0)]
    quantity: i32,

    #[arg(long, default_value = "")]
    description: String,

    /// Image URL
    #[arg(long, default_value = "")]
    image: String,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let service = args.database.products_service().await?;

    let product = service
        .create_product(NewProduct {
            uuid: args.uuid.map_or_else(ProductUuid::new, ProductUuid::from_uuid),
            name: args.name,
            description: args.description,
            image: args.image,
            price: args.price,
            quantity: args.quantity,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("name: {}", product.name);
    println!("price: {}", product.price);
    println!("quantity: {}", product.quantity);

    Ok(())
}
