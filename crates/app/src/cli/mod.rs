use clap::{Args, Parser, Subcommand};
use ecom_app::{
    database::{self, Db, PoolOptions},
    domain::products::PgProductsService,
    unit_of_work::PgUnitOfWork,
};

mod product;

#[derive(Debug, Parser)]
#[command(name = "ecom-app", about = "Ecom catalogue CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Product(product::ProductCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Product(command) => product::run(command).await,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

impl DatabaseArgs {
    pub(crate) async fn products_service(&self) -> Result<PgProductsService, String> {
        let pool = database::connect(
            &self.database_url,
            PoolOptions {
                max_connections: 1,
                ..PoolOptions::default()
            },
        )
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

        Ok(PgProductsService::new(PgUnitOfWork::new(Db::new(pool))))
    }
}
