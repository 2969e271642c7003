//! # Basket Service
//!
//! Holds the collaborators every command handler needs. The handlers
//! themselves live in [`crate::commands`].
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ServiceConfig                                                          │
//! │       │                                                                 │
//! │       ├── database_path set?                                            │
//! │       │     ├── yes ─► Database::new ─► SqliteItemCatalog               │
//! │       │     │                          SqliteBasketRepository           │
//! │       │     └── no ──► InMemoryItemCatalog (default catalog)            │
//! │       │                InMemoryBasketRepository                         │
//! │       │                                                                 │
//! │       └── vat_rate, shipping ─────────────────┐                         │
//! │                                               ▼                         │
//! │  BasketService { catalog, baskets, codes, vat_rate, shipping }          │
//! │  Clone = cheap (Arc)                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use basket_core::{Basket, BasketId, DiscountCodes, ShippingPolicy, StaticDiscountCodes, VatRate};
use basket_db::{
    BasketRepository, Database, InMemoryBasketRepository, InMemoryItemCatalog, ItemCatalog,
};
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};

/// Command handler host.
#[derive(Clone)]
pub struct BasketService {
    pub(crate) catalog: Arc<dyn ItemCatalog>,
    pub(crate) baskets: Arc<dyn BasketRepository>,
    pub(crate) codes: Arc<dyn DiscountCodes>,
    pub(crate) vat_rate: VatRate,
    pub(crate) shipping: ShippingPolicy,
}

impl BasketService {
    /// Creates a service over the given stores with the default code table,
    /// the standard VAT rate and the default shipping policy.
    pub fn new(catalog: Arc<dyn ItemCatalog>, baskets: Arc<dyn BasketRepository>) -> Self {
        BasketService {
            catalog,
            baskets,
            codes: Arc::new(StaticDiscountCodes::default()),
            vat_rate: VatRate::STANDARD,
            shipping: ShippingPolicy::default(),
        }
    }

    /// In-memory stores seeded with the default catalog.
    pub fn in_memory() -> Self {
        BasketService::new(
            Arc::new(InMemoryItemCatalog::default()),
            Arc::new(InMemoryBasketRepository::new()),
        )
    }

    /// Builds the service described by `config`, connecting to SQLite when a
    /// database path is set.
    pub async fn from_config(config: &ServiceConfig) -> ServiceResult<Self> {
        let service = match config.db_config() {
            Some(db_config) => {
                info!(path = %db_config.database_path.display(), "Using SQLite stores");
                let db = Database::new(db_config).await?;
                BasketService::new(Arc::new(db.items()), Arc::new(db.baskets()))
            }
            None => {
                info!("Using in-memory stores");
                BasketService::in_memory()
            }
        };

        Ok(service
            .with_vat_rate(config.vat_rate)
            .with_shipping_policy(config.shipping.clone()))
    }

    /// Replaces the discount-code table.
    pub fn with_discount_codes(mut self, codes: Arc<dyn DiscountCodes>) -> Self {
        self.codes = codes;
        self
    }

    pub fn with_vat_rate(mut self, vat_rate: VatRate) -> Self {
        self.vat_rate = vat_rate;
        self
    }

    pub fn with_shipping_policy(mut self, shipping: ShippingPolicy) -> Self {
        self.shipping = shipping;
        self
    }

    pub fn vat_rate(&self) -> VatRate {
        self.vat_rate
    }

    /// Loads a basket, logging misses.
    pub(crate) async fn load_basket(&self, id: BasketId) -> ServiceResult<Basket> {
        self.baskets.get(id).await.map_err(|err| {
            if err.is_not_found() {
                warn!(basket_id = %id, "Basket not found");
            }
            ServiceError::from(err)
        })
    }

    /// Persists the next basket value as one whole-record replace.
    pub(crate) async fn save_basket(&self, basket: Basket) -> ServiceResult<Basket> {
        Ok(self.baskets.replace(basket).await?)
    }
}

impl std::fmt::Debug for BasketService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasketService")
            .field("vat_rate", &self.vat_rate)
            .field("shipping", &self.shipping)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::ErrorCode;

    #[tokio::test]
    async fn test_from_default_config_uses_memory() {
        let service = BasketService::from_config(&ServiceConfig::default())
            .await
            .unwrap();
        assert_eq!(service.vat_rate(), VatRate::STANDARD);

        let err = service.load_basket(BasketId::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BasketNotFound);
    }

    #[tokio::test]
    async fn test_builder_overrides() {
        let service = BasketService::in_memory()
            .with_vat_rate(VatRate::from_bps(500))
            .with_discount_codes(Arc::new(StaticDiscountCodes::empty()));

        assert_eq!(service.vat_rate().bps(), 500);
        assert!(!service.codes.is_valid("SAVE10"));
    }
}
