//! Server configuration from the environment.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::str::FromStr;
use stitch_core::PricingPolicy;

/// Everything the binary needs to start serving.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL connection string (`DATABASE_URL`, required).
    pub database_url: String,

    /// Bind address (`BIND_ADDR`, default `0.0.0.0:3000`).
    pub bind_addr: String,

    /// Pool size (`DATABASE_MAX_CONNECTIONS`, default 10).
    pub max_connections: u32,

    /// Shipping/tax policy assembled from `SHIPPING_FEE`,
    /// `FREE_SHIPPING_THRESHOLD` and `TAX_RATE`. All default to zero, which
    /// keeps order totals equal to the plain item sum.
    pub pricing: PricingPolicy,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when `DATABASE_URL` is missing or any numeric
    /// variable fails to parse.
    pub fn from_env() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be an integer")?,
            Err(_) => 10,
        };

        let mut pricing = PricingPolicy::new(decimal_env("SHIPPING_FEE")?.unwrap_or(Decimal::ZERO));
        if let Some(threshold) = decimal_env("FREE_SHIPPING_THRESHOLD")? {
            pricing = pricing.with_free_shipping_over(threshold);
        }
        if let Some(rate) = decimal_env("TAX_RATE")? {
            pricing = pricing.with_tax_rate(rate);
        }

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            pricing,
        })
    }
}

/// Parse an optional decimal environment variable.
fn decimal_env(name: &str) -> Result<Option<Decimal>> {
    match std::env::var(name) {
        Ok(raw) => Decimal::from_str(&raw)
            .map(Some)
            .with_context(|| format!("{name} must be a decimal number")),
        Err(_) => Ok(None),
    }
}
