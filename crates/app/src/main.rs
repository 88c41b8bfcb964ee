//! Ecom operator CLI

use std::process;

use clap::Parser;

mod cli;

#[tokio::main]
pub async fn main() {
    // A missing .env file is fine.
    _ = dotenvy::dotenv();

    if let Err(error) = cli::Cli::parse().run().await {
        #[expect(
            clippy::print_stderr,
            reason = "operator-facing CLI reports failures on stderr"
        )]
        {
            eprintln!("{error}");
        }

        process::exit(1);
    }
}
