//! # In-Memory Stores
//!
//! Process-local catalog and basket stores. Used by tests and by the service
//! when no database path is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use basket_core::{Basket, BasketId, Item, ItemId};
use tokio::sync::RwLock;
use tracing::debug;

use super::{check_item, dedup_ids, default_items, BasketRepository, ItemCatalog};
use crate::error::{Entity, StoreError, StoreResult};

// =============================================================================
// Item Catalog
// =============================================================================

/// Immutable catalog held in memory, listed in insertion order.
#[derive(Debug, Clone)]
pub struct InMemoryItemCatalog {
    items: Vec<Item>,
    by_id: HashMap<ItemId, usize>,
}

impl InMemoryItemCatalog {
    /// Builds a catalog from `items`. A later item with the same id wins.
    ///
    /// Fails with `StoreError::InvalidItem` when any price is negative.
    pub fn new(items: impl IntoIterator<Item = Item>) -> StoreResult<Self> {
        let mut catalog = InMemoryItemCatalog {
            items: Vec::new(),
            by_id: HashMap::new(),
        };
        for item in items {
            check_item(&item)?;
            catalog.insert(item);
        }
        Ok(catalog)
    }

    fn insert(&mut self, item: Item) {
        match self.by_id.get(&item.id) {
            Some(&index) => self.items[index] = item,
            None => {
                self.by_id.insert(item.id, self.items.len());
                self.items.push(item);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for InMemoryItemCatalog {
    /// The built-in eight-item catalog.
    fn default() -> Self {
        let mut catalog = InMemoryItemCatalog {
            items: Vec::new(),
            by_id: HashMap::new(),
        };
        default_items()
            .into_iter()
            .for_each(|item| catalog.insert(item));
        catalog
    }
}

#[async_trait]
impl ItemCatalog for InMemoryItemCatalog {
    async fn get_item(&self, id: ItemId) -> StoreResult<Item> {
        self.by_id
            .get(&id)
            .map(|&index| self.items[index].clone())
            .ok_or_else(|| StoreError::not_found(Entity::Item, id))
    }

    async fn get_items(&self, ids: &[ItemId]) -> StoreResult<HashMap<ItemId, Item>> {
        Ok(dedup_ids(ids)
            .into_iter()
            .filter_map(|id| {
                self.by_id
                    .get(&id)
                    .map(|&index| (id, self.items[index].clone()))
            })
            .collect())
    }

    async fn list_items(&self) -> StoreResult<Vec<Item>> {
        Ok(self.items.clone())
    }
}

// =============================================================================
// Basket Repository
// =============================================================================

/// Baskets keyed by id behind a tokio `RwLock`.
///
/// Each call takes the lock once, so a `replace` is applied whole or not at
/// all. Two callers racing on the same basket both succeed and the later
/// write wins.
#[derive(Debug, Default)]
pub struct InMemoryBasketRepository {
    baskets: RwLock<HashMap<BasketId, Basket>>,
}

impl InMemoryBasketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored baskets.
    pub async fn len(&self) -> usize {
        self.baskets.read().await.len()
    }
}

#[async_trait]
impl BasketRepository for InMemoryBasketRepository {
    async fn create(&self) -> StoreResult<Basket> {
        let basket = Basket::new();
        self.baskets.write().await.insert(basket.id, basket.clone());
        debug!(basket_id = %basket.id, "Basket created in memory");
        Ok(basket)
    }

    async fn get(&self, id: BasketId) -> StoreResult<Basket> {
        self.baskets
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::Basket, id))
    }

    async fn replace(&self, basket: Basket) -> StoreResult<Basket> {
        let mut baskets = self.baskets.write().await;
        match baskets.get_mut(&basket.id) {
            Some(stored) => {
                *stored = basket.clone();
                Ok(basket)
            }
            None => Err(StoreError::not_found(Entity::Basket, basket.id)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::{Money, Shipping};

    #[tokio::test]
    async fn test_default_catalog_lookup() {
        let catalog = InMemoryItemCatalog::default();
        assert_eq!(catalog.len(), 8);

        let laptop_id: ItemId = "11111111-1111-1111-1111-111111111111".parse().unwrap();
        let laptop = catalog.get_item(laptop_id).await.unwrap();
        assert_eq!(laptop.name, "Laptop");
        assert_eq!(laptop.price, Money::from_pennies(100_000));
    }

    #[tokio::test]
    async fn test_missing_item_is_not_found() {
        let catalog = InMemoryItemCatalog::default();
        let err = catalog.get_item(ItemId::new()).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: Entity::Item,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_get_items_batched() {
        let catalog = InMemoryItemCatalog::default();
        let items = catalog.list_items().await.unwrap();
        let unknown = ItemId::new();

        let found = catalog
            .get_items(&[items[0].id, items[1].id, items[0].id, unknown])
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert!(found.contains_key(&items[1].id));
        assert!(!found.contains_key(&unknown));
    }

    #[tokio::test]
    async fn test_catalog_later_duplicate_wins() {
        let id = ItemId::new();
        let catalog = InMemoryItemCatalog::new([
            Item::new(id, "Old", Money::from_pennies(100)),
            Item::new(id, "New", Money::from_pennies(200)),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get_item(id).await.unwrap().name, "New");
    }

    #[test]
    fn test_catalog_rejects_negative_price() {
        let err = InMemoryItemCatalog::new([
            Item::new(ItemId::new(), "Laptop", Money::from_pennies(100_000)),
            Item::new(ItemId::new(), "Refund", Money::from_pennies(-1)),
        ])
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidItem { .. }));
    }

    #[tokio::test]
    async fn test_basket_create_get_replace() {
        let repo = InMemoryBasketRepository::new();
        let basket = repo.create().await.unwrap();
        assert_eq!(repo.len().await, 1);

        let loaded = repo.get(basket.id).await.unwrap();
        assert_eq!(loaded, basket);

        let updated = loaded.with_shipping(Shipping {
            country: "UK".to_string(),
            cost: Money::from_pennies(599),
        });
        repo.replace(updated.clone()).await.unwrap();
        assert_eq!(repo.get(basket.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_unknown_basket() {
        let repo = InMemoryBasketRepository::new();
        let err = repo.get(BasketId::new()).await.unwrap_err();
        assert_eq!(err.error_code(), Some(basket_core::ErrorCode::BasketNotFound));

        let err = repo.replace(Basket::new()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.len().await, 0);
    }
}
