//! # Repository Module
//!
//! Store contracts the command handlers depend on, plus their implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BasketService                                                         │
//! │  ├── Arc<dyn ItemCatalog>        get_item / get_items / list_items     │
//! │  └── Arc<dyn BasketRepository>   create / get / replace                │
//! │       │                                                                 │
//! │       ├──► memory.rs   InMemoryItemCatalog, InMemoryBasketRepository   │
//! │       │                (tokio RwLock<HashMap>)                          │
//! │       │                                                                 │
//! │       └──► item.rs     SqliteItemCatalog                               │
//! │            basket.rs   SqliteBasketRepository (JSON document)          │
//! │                                                                         │
//! │  Handlers never know which one they talk to.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use basket_core::{Basket, BasketId, Item, ItemId, Money};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

pub mod basket;
pub mod item;
pub mod memory;

// =============================================================================
// Store Contracts
// =============================================================================

/// Read access to the item catalog.
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// Looks up one item. `StoreError::NotFound` when missing.
    async fn get_item(&self, id: ItemId) -> StoreResult<Item>;

    /// Looks up several items at once.
    ///
    /// Missing ids are simply absent from the returned map; duplicate ids are
    /// looked up once.
    async fn get_items(&self, ids: &[ItemId]) -> StoreResult<HashMap<ItemId, Item>>;

    /// Every item in the catalog.
    async fn list_items(&self) -> StoreResult<Vec<Item>>;
}

/// Load/save access to baskets. Writes replace the whole record.
#[async_trait]
pub trait BasketRepository: Send + Sync {
    /// Creates and stores a new empty basket.
    async fn create(&self) -> StoreResult<Basket>;

    /// Loads a basket. `StoreError::NotFound` when missing.
    async fn get(&self, id: BasketId) -> StoreResult<Basket>;

    /// Replaces a stored basket. `StoreError::NotFound` when it was never
    /// created.
    async fn replace(&self, basket: Basket) -> StoreResult<Basket>;
}

// =============================================================================
// Default Catalog
// =============================================================================

const DEFAULT_ITEMS: &[(u128, &str, i64)] = &[
    (0x11111111_1111_1111_1111_111111111111, "Laptop", 100_000),
    (0x22222222_2222_2222_2222_222222222222, "Wireless Mouse", 3_000),
    (0x33333333_3333_3333_3333_333333333333, "Mechanical Keyboard", 15_000),
    (0x44444444_4444_4444_4444_444444444444, "USB-C Hub", 8_000),
    (0x55555555_5555_5555_5555_555555555555, "Wireless Headphones", 20_000),
    (0x66666666_6666_6666_6666_666666666666, "External Monitor", 30_000),
    (0x77777777_7777_7777_7777_777777777777, "Smartphone", 70_000),
    (0x88888888_8888_8888_8888_888888888888, "Tablet", 40_000),
];

/// The built-in catalog. The SQLite seed migration inserts the same rows.
pub fn default_items() -> Vec<Item> {
    DEFAULT_ITEMS
        .iter()
        .map(|(id, name, pennies)| {
            Item::new(
                ItemId::from_uuid(Uuid::from_u128(*id)),
                *name,
                Money::from_pennies(*pennies),
            )
        })
        .collect()
}

/// Rejects items the catalog must never hold: prices are non-negative.
pub(crate) fn check_item(item: &Item) -> StoreResult<()> {
    if item.price.is_negative() {
        return Err(StoreError::InvalidItem {
            id: item.id.to_string(),
            reason: format!("negative price {}", item.price.amount()),
        });
    }
    Ok(())
}

/// Removes duplicates while keeping first-seen order.
pub(crate) fn dedup_ids(ids: &[ItemId]) -> Vec<ItemId> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
