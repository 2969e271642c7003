//! # basket-db: Storage Layer for the Basket Engine
//!
//! This crate provides the item catalog and basket stores the command
//! handlers depend on, behind two async traits.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Basket Engine Data Flow                          │
//! │                                                                         │
//! │  BasketService::add_items                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     basket-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Contracts   │    │ Implementations│    │  Migrations  │  │   │
//! │  │   │               │    │                │    │  (embedded)  │  │   │
//! │  │   │ ItemCatalog   │◄───│ InMemory*      │    │ 001_schema   │  │   │
//! │  │   │ BasketRepo    │    │ Sqlite*        │    │ 002_seed     │  │   │
//! │  │   └───────────────┘    └───────┬────────┘    └──────────────┘  │   │
//! │  │                                │                                │   │
//! │  └────────────────────────────────┼────────────────────────────────┘   │
//! │                                   ▼                                     │
//! │                    Database (pool.rs) → SQLite file or :memory:        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//! - [`repository`] - Store contracts and implementations
//!
//! ## Usage
//!
//! ```rust,no_run
//! use basket_db::{BasketRepository, Database, DbConfig, ItemCatalog};
//!
//! # async fn run() -> Result<(), basket_db::StoreError> {
//! let db = Database::new(DbConfig::new("baskets.db")).await?;
//!
//! let items = db.items().list_items().await?;
//! let basket = db.baskets().create().await?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{Entity, StoreError, StoreResult};
pub use pool::{Database, DbConfig};

pub use repository::basket::SqliteBasketRepository;
pub use repository::item::SqliteItemCatalog;
pub use repository::memory::{InMemoryBasketRepository, InMemoryItemCatalog};
pub use repository::{default_items, BasketRepository, ItemCatalog};
