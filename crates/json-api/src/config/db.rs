//! Database Config

use std::time::Duration;

use clap::Args;

use ecom_app::database::PoolOptions;

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum number of pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,

    /// Seconds to wait for a pooled connection
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECONDS", default_value_t = 5)]
    pub db_acquire_timeout_seconds: u64,

    /// Per-statement timeout in milliseconds, 0 disables it
    #[arg(long, env = "DB_STATEMENT_TIMEOUT_MS", default_value_t = 5_000)]
    pub db_statement_timeout_ms: u64,

    /// Deadline for a whole checkout transaction in milliseconds, 0 disables it
    #[arg(long, env = "CHECKOUT_TIMEOUT_MS", default_value_t = 10_000)]
    pub checkout_timeout_ms: u64,
}

impl DatabaseConfig {
    #[must_use]
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout_seconds),
        }
    }

    #[must_use]
    pub fn statement_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.db_statement_timeout_ms)
    }

    #[must_use]
    pub fn checkout_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.checkout_timeout_ms)
    }
}

fn non_zero_millis(millis: u64) -> Option<Duration> {
    (millis > 0).then(|| Duration::from_millis(millis))
}
