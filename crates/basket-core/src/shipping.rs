//! # Shipping Policy
//!
//! Maps a destination country to a shipping cost. One country is domestic;
//! every other non-blank name, recognised or not, is international.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Shipping;

/// Default domestic destination.
pub const DEFAULT_DOMESTIC_COUNTRY: &str = "UK";

/// Default domestic cost in pennies (5.99).
pub const DEFAULT_DOMESTIC_PENNIES: i64 = 599;

/// Default international cost in pennies (12.99).
pub const DEFAULT_INTERNATIONAL_PENNIES: i64 = 1299;

/// Flat-rate shipping costs keyed on a single domestic country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingPolicy {
    domestic_country: String,
    domestic_cost: Money,
    international_cost: Money,
}

impl ShippingPolicy {
    pub fn new(
        domestic_country: impl Into<String>,
        domestic_cost: Money,
        international_cost: Money,
    ) -> Self {
        ShippingPolicy {
            domestic_country: domestic_country.into().trim().to_string(),
            domestic_cost,
            international_cost,
        }
    }

    pub fn domestic_country(&self) -> &str {
        &self.domestic_country
    }

    /// Whether `country` is the domestic destination (case-insensitive).
    pub fn is_domestic(&self, country: &str) -> bool {
        country.trim().eq_ignore_ascii_case(&self.domestic_country)
    }

    /// Quotes shipping for `country`.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::{Money, ShippingPolicy};
    ///
    /// let policy = ShippingPolicy::default();
    /// assert_eq!(policy.quote("uk").unwrap().cost, Money::from_pennies(599));
    /// assert_eq!(policy.quote("France").unwrap().cost, Money::from_pennies(1299));
    /// assert!(policy.quote("  ").is_err());
    /// ```
    pub fn quote(&self, country: &str) -> Result<Shipping, ValidationError> {
        let country = crate::validation::validate_shipping_country(country)?;
        let cost = if self.is_domestic(country) {
            self.domestic_cost
        } else {
            self.international_cost
        };

        Ok(Shipping {
            country: country.to_string(),
            cost,
        })
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        ShippingPolicy::new(
            DEFAULT_DOMESTIC_COUNTRY,
            Money::from_pennies(DEFAULT_DOMESTIC_PENNIES),
            Money::from_pennies(DEFAULT_INTERNATIONAL_PENNIES),
        )
    }
}
