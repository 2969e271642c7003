//! # Item Catalog (SQLite)
//!
//! Reads catalog rows from the `items` table. Prices are stored as decimal
//! strings and parsed back into [`Money`] without loss.

use std::collections::HashMap;

use async_trait::async_trait;
use basket_core::{Item, ItemId, Money};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::{check_item, dedup_ids, ItemCatalog};
use crate::error::{Entity, StoreError, StoreResult};

/// Raw `items` row.
#[derive(Debug, FromRow)]
struct ItemRow {
    id: String,
    name: String,
    price: String,
}

impl TryFrom<ItemRow> for Item {
    type Error = StoreError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let id: ItemId = row.id.parse()?;
        let price: Money = row.price.parse().map_err(|e| {
            StoreError::Serialization(format!("invalid price '{}' for item {id}: {e}", row.price))
        })?;
        let item = Item::new(id, row.name, price);
        check_item(&item)?;
        Ok(item)
    }
}

/// Catalog backed by the `items` table.
#[derive(Debug, Clone)]
pub struct SqliteItemCatalog {
    pool: SqlitePool,
}

impl SqliteItemCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteItemCatalog { pool }
    }

    /// Inserts or replaces a catalog item. Negative prices are rejected
    /// before anything is written.
    pub async fn upsert(&self, item: &Item) -> StoreResult<()> {
        check_item(item)?;
        sqlx::query(
            r#"
            INSERT INTO items (id, name, price) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name, price = excluded.price
            "#,
        )
        .bind(item.id.to_string())
        .bind(&item.name)
        .bind(item.price.amount().to_string())
        .execute(&self.pool)
        .await?;

        debug!(item_id = %item.id, "Item upserted");
        Ok(())
    }
}

#[async_trait]
impl ItemCatalog for SqliteItemCatalog {
    async fn get_item(&self, id: ItemId) -> StoreResult<Item> {
        let row: Option<ItemRow> =
            sqlx::query_as("SELECT id, name, price FROM items WHERE id = ?1")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| StoreError::not_found(Entity::Item, id))?
            .try_into()
    }

    async fn get_items(&self, ids: &[ItemId]) -> StoreResult<HashMap<ItemId, Item>> {
        let ids = dedup_ids(ids);
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, name, price FROM items WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in &ids {
            separated.push_bind(id.to_string());
        }
        separated.push_unseparated(")");

        let rows: Vec<ItemRow> = query.build_query_as().fetch_all(&self.pool).await?;
        debug!(requested = ids.len(), found = rows.len(), "Batched item lookup");

        rows.into_iter()
            .map(|row| Item::try_from(row).map(|item| (item.id, item)))
            .collect()
    }

    async fn list_items(&self) -> StoreResult<Vec<Item>> {
        let rows: Vec<ItemRow> =
            sqlx::query_as("SELECT id, name, price FROM items ORDER BY rowid")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Item::try_from).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::default_items;

    async fn catalog() -> SqliteItemCatalog {
        Database::new(DbConfig::in_memory()).await.unwrap().items()
    }

    #[tokio::test]
    async fn test_seeded_catalog_matches_default_items() {
        let items = catalog().await.list_items().await.unwrap();
        assert_eq!(items, default_items());
    }

    #[tokio::test]
    async fn test_get_item() {
        let catalog = catalog().await;
        let tablet_id: ItemId = "88888888-8888-8888-8888-888888888888".parse().unwrap();

        let tablet = catalog.get_item(tablet_id).await.unwrap();
        assert_eq!(tablet.name, "Tablet");
        assert_eq!(tablet.price, Money::from_pennies(40_000));

        let err = catalog.get_item(ItemId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_items_skips_missing() {
        let catalog = catalog().await;
        let known = default_items();

        let found = catalog
            .get_items(&[known[2].id, ItemId::new(), known[2].id, known[5].id])
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[&known[5].id].name, "External Monitor");

        assert!(catalog.get_items(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_keeps_sub_penny_price() {
        let catalog = catalog().await;
        let item = Item::new(
            ItemId::new(),
            "Cable",
            Money::from_str_exact("2.495").unwrap(),
        );
        catalog.upsert(&item).await.unwrap();

        let loaded = catalog.get_item(item.id).await.unwrap();
        assert_eq!(loaded, item);
    }

    #[tokio::test]
    async fn test_upsert_rejects_negative_price() {
        let catalog = catalog().await;
        let item = Item::new(ItemId::new(), "Refund", Money::from_pennies(-500));

        let err = catalog.upsert(&item).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidItem { .. }));
        assert!(catalog.get_item(item.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_negative_price_row_is_rejected_on_read() {
        let catalog = catalog().await;
        let id = ItemId::new();
        sqlx::query("INSERT INTO items (id, name, price) VALUES (?1, 'Refund', '-5.00')")
            .bind(id.to_string())
            .execute(&catalog.pool)
            .await
            .unwrap();

        let err = catalog.get_item(id).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidItem { .. }));
    }
}
