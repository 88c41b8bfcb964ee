//! App Context

use std::{sync::Arc, time::Duration};

use jiff::SignedDuration;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService, TokenError, TokenSigner},
    database::{self, Db, PoolOptions},
    domain::{
        checkout::{CheckoutService, PgCheckoutService},
        products::{PgProductsService, ProductsService},
    },
    unit_of_work::PgUnitOfWork,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("invalid token signing configuration")]
    Token(#[from] TokenError),
}

/// Tunables applied when wiring services to the database.
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    pub pool: PoolOptions,
    pub statement_timeout: Option<Duration>,
    pub checkout_timeout: Option<Duration>,
    pub token_ttl: SignedDuration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            pool: PoolOptions::default(),
            statement_timeout: Some(Duration::from_secs(5)),
            checkout_timeout: Some(Duration::from_secs(10)),
            token_ttl: SignedDuration::from_secs(600),
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails or the token secret is
    /// too short.
    pub async fn from_database_url(
        url: &str,
        settings: AppSettings,
        token_secret: impl Into<Vec<u8>>,
    ) -> Result<Self, AppInitError> {
        let signer = TokenSigner::new(token_secret)?;

        let pool = database::connect(url, settings.pool)
            .await
            .map_err(AppInitError::Database)?;

        let mut db = Db::new(pool);

        if let Some(timeout) = settings.statement_timeout {
            db = db.with_statement_timeout(timeout);
        }

        let uow = PgUnitOfWork::new(db);

        let checkout_uow = match settings.checkout_timeout {
            Some(deadline) => uow.clone().with_deadline(deadline),
            None => uow.clone(),
        };

        Ok(Self {
            products: Arc::new(PgProductsService::new(uow.clone())),
            checkout: Arc::new(PgCheckoutService::new(checkout_uow)),
            auth: Arc::new(PgAuthService::new(uow, signer, settings.token_ttl)),
        })
    }
}
