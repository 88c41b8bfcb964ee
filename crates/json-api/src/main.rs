//! Ecom JSON API Server

use std::process;

use salvo::prelude::*;
use tracing::{error, info};

use ecom_app::context::{AppContext, AppSettings};

use crate::{config::ServerConfig, observability::Observability, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod auth;
mod carts;
mod config;
mod extensions;
mod healthcheck;
mod money;
mod observability;
mod products;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod users;

fn app_settings(config: &ServerConfig) -> AppSettings {
    AppSettings {
        pool: config.database.pool_options(),
        statement_timeout: config.database.statement_timeout(),
        checkout_timeout: config.database.checkout_timeout(),
        token_ttl: config.auth.token_ttl(),
    }
}

/// Ecom JSON API Server entry point
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|error| error.exit());

    let observability = match Observability::init(&config) {
        Ok(observability) => observability,
        Err(init_error) => {
            #[expect(
                clippy::print_stderr,
                reason = "the subscriber failed to install, so stderr is the only sink"
            )]
            {
                eprintln!("failed to initialise observability: {init_error}");
            }

            process::exit(1);
        }
    };

    let app = match AppContext::from_database_url(
        &config.database.database_url,
        app_settings(&config),
        config.auth.auth_token_secret.as_bytes(),
    )
    .await
    {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");
            observability.shutdown();

            process::exit(1);
        }
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;
    let server = Server::new(listener);
    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server
        .serve(router::app_router(State::from_app_context(app)))
        .await;

    observability.shutdown();
}
