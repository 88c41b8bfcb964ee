//! Auth Config

use std::fmt::{Debug, Formatter, Result as FmtResult};

use clap::Args;
use jiff::SignedDuration;

/// Bearer token settings.
#[derive(Args)]
pub struct AuthConfig {
    /// HMAC secret used to sign bearer tokens (at least 32 bytes)
    #[arg(long, env = "AUTH_TOKEN_SECRET", hide_env_values = true)]
    pub auth_token_secret: String,

    /// Lifetime of issued bearer tokens in seconds
    #[arg(long, env = "AUTH_TOKEN_TTL_SECONDS", default_value_t = 600)]
    pub auth_token_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn token_ttl(&self) -> SignedDuration {
        SignedDuration::from_secs(self.auth_token_ttl_seconds)
    }
}

impl Debug for AuthConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AuthConfig")
            .field("auth_token_secret", &"**redacted**")
            .field("auth_token_ttl_seconds", &self.auth_token_ttl_seconds)
            .finish()
    }
}
