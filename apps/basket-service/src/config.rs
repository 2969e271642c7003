//! # Service Configuration
//!
//! Pricing and storage settings loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BASKET_*`)
//! 2. Defaults (this file)
//!
//! | Variable                        | Default  | Meaning                          |
//! |---------------------------------|----------|----------------------------------|
//! | `BASKET_VAT_RATE_BPS`           | `2000`   | VAT in basis points (20%)        |
//! | `BASKET_DOMESTIC_COUNTRY`       | `UK`     | Country charged domestic rate    |
//! | `BASKET_DOMESTIC_SHIPPING`      | `5.99`   | Domestic shipping cost           |
//! | `BASKET_INTERNATIONAL_SHIPPING` | `12.99`  | Every other country              |
//! | `BASKET_DATABASE_PATH`          | unset    | SQLite file; unset = in-memory   |
//!
//! ## Thread Safety
//! Configuration is read-only after initialization.

use std::env;
use std::path::PathBuf;

use basket_core::shipping::{
    DEFAULT_DOMESTIC_COUNTRY, DEFAULT_DOMESTIC_PENNIES, DEFAULT_INTERNATIONAL_PENNIES,
};
use basket_core::{Money, ShippingPolicy, VatRate};
use basket_db::DbConfig;
use tracing::warn;

pub const ENV_VAT_RATE_BPS: &str = "BASKET_VAT_RATE_BPS";
pub const ENV_DOMESTIC_COUNTRY: &str = "BASKET_DOMESTIC_COUNTRY";
pub const ENV_DOMESTIC_SHIPPING: &str = "BASKET_DOMESTIC_SHIPPING";
pub const ENV_INTERNATIONAL_SHIPPING: &str = "BASKET_INTERNATIONAL_SHIPPING";
pub const ENV_DATABASE_PATH: &str = "BASKET_DATABASE_PATH";

/// Configuration error types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// VAT applied to subtotal + shipping.
    pub vat_rate: VatRate,

    /// Shipping cost per destination.
    pub shipping: ShippingPolicy,

    /// SQLite database file. `None` selects the in-memory stores.
    pub database_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            vat_rate: VatRate::STANDARD,
            shipping: ShippingPolicy::default(),
            database_path: None,
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from the process environment, rejecting invalid
    /// values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration from the process environment, falling back to the
    /// defaults (with a warning) when any value is invalid.
    pub fn from_env() -> Self {
        Self::load().unwrap_or_else(|err| {
            warn!(error = %err, "Invalid configuration, using defaults");
            ServiceConfig::default()
        })
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// ## Example
    /// ```rust
    /// use basket_service::config::ServiceConfig;
    ///
    /// let config = ServiceConfig::from_lookup(|name| match name {
    ///     "BASKET_VAT_RATE_BPS" => Some("500".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.vat_rate.bps(), 500);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vat_bps = match lookup(ENV_VAT_RATE_BPS) {
            Some(raw) => parse_vat_bps(&raw)?,
            None => VatRate::STANDARD.bps(),
        };

        let domestic_country = match lookup(ENV_DOMESTIC_COUNTRY) {
            Some(raw) if raw.trim().is_empty() => {
                return Err(invalid(ENV_DOMESTIC_COUNTRY, &raw));
            }
            Some(raw) => raw.trim().to_string(),
            None => DEFAULT_DOMESTIC_COUNTRY.to_string(),
        };

        let domestic_cost = parse_cost(
            &lookup,
            ENV_DOMESTIC_SHIPPING,
            Money::from_pennies(DEFAULT_DOMESTIC_PENNIES),
        )?;
        let international_cost = parse_cost(
            &lookup,
            ENV_INTERNATIONAL_SHIPPING,
            Money::from_pennies(DEFAULT_INTERNATIONAL_PENNIES),
        )?;

        let database_path = lookup(ENV_DATABASE_PATH)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        Ok(ServiceConfig {
            vat_rate: VatRate::from_bps(vat_bps),
            shipping: ShippingPolicy::new(domestic_country, domestic_cost, international_cost),
            database_path,
        })
    }

    /// SQLite configuration, when a database path is set.
    pub fn db_config(&self) -> Option<DbConfig> {
        self.database_path.as_ref().map(DbConfig::new)
    }
}

fn invalid(name: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn parse_vat_bps(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|bps| *bps <= VatRate::MAX.bps())
        .ok_or_else(|| invalid(ENV_VAT_RATE_BPS, raw))
}

fn parse_cost<F>(lookup: &F, name: &str, default: Money) -> Result<Money, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<Money>()
            .ok()
            .filter(|cost| !cost.is_negative())
            .ok_or_else(|| invalid(name, &raw)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
