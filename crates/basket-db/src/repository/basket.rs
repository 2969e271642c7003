//! # Basket Repository (SQLite)
//!
//! Each basket is one row holding the whole aggregate as a JSON document.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ baskets                                                          │
//! │ id (TEXT PK) │ document (JSON Basket) │ created_at │ updated_at  │
//! └──────────────────────────────────────────────────────────────────┘
//!
//! replace(basket) = single UPDATE ... WHERE id = ?
//!                   0 rows affected → basket_not_found
//! ```
//!
//! A single statement per write means a dropped future leaves either the old
//! document or the new one, never a mix.

use async_trait::async_trait;
use basket_core::{Basket, BasketId};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::BasketRepository;
use crate::error::{Entity, StoreError, StoreResult};

/// Basket store backed by the `baskets` table.
#[derive(Debug, Clone)]
pub struct SqliteBasketRepository {
    pool: SqlitePool,
}

impl SqliteBasketRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteBasketRepository { pool }
    }
}

#[async_trait]
impl BasketRepository for SqliteBasketRepository {
    async fn create(&self) -> StoreResult<Basket> {
        let basket = Basket::new();
        let document = serde_json::to_string(&basket)?;
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO baskets (id, document, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
        )
        .bind(basket.id.to_string())
        .bind(document)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(basket_id = %basket.id, "Basket row inserted");
        Ok(basket)
    }

    async fn get(&self, id: BasketId) -> StoreResult<Basket> {
        let document: Option<String> =
            sqlx::query_scalar("SELECT document FROM baskets WHERE id = ?1")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        let document = document.ok_or_else(|| StoreError::not_found(Entity::Basket, id))?;
        Ok(serde_json::from_str(&document)?)
    }

    async fn replace(&self, basket: Basket) -> StoreResult<Basket> {
        let document = serde_json::to_string(&basket)?;

        let result = sqlx::query("UPDATE baskets SET document = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(document)
            .bind(Utc::now())
            .bind(basket.id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(Entity::Basket, basket.id));
        }

        debug!(basket_id = %basket.id, lines = basket.items.len(), "Basket document replaced");
        Ok(basket)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
