//! # Basket Service Library
//!
//! Command handlers over the basket engine: validation, store wiring,
//! configuration and logging.
//!
//! ## Module Organization
//! ```text
//! basket_service/
//! ├── lib.rs          ◄─── You are here (tracing setup, re-exports)
//! ├── service.rs      ◄─── BasketService: stores, codes, VAT, shipping
//! ├── config.rs       ◄─── BASKET_* environment configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command payloads
//! │   ├── basket.rs   ◄─── Basket mutation and totals
//! │   └── item.rs     ◄─── Catalog listing
//! └── error.rs        ◄─── ServiceError { code, message }
//! ```
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  caller ──► command payload ──► BasketService::<handler>                │
//! │                                      │                                  │
//! │               ┌──────────────────────┼──────────────────────┐           │
//! │               ▼                      ▼                      ▼           │
//! │        basket_core::validation   basket_db stores    basket_core::pricing│
//! │               │                      │                      │           │
//! │               └──────────────────────┴──────────────────────┘           │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                  Ok(Basket | BasketTotal) | Err(ServiceError)           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use basket_core::{AddItemRequest, ItemId};
//! use basket_service::commands::AddBasketItemsCommand;
//! use basket_service::BasketService;
//!
//! # async fn demo() -> Result<(), basket_service::ServiceError> {
//! let service = BasketService::in_memory();
//! let basket = service.create_basket().await?;
//!
//! let laptop: ItemId = "11111111-1111-1111-1111-111111111111".parse().unwrap();
//! service
//!     .add_items(AddBasketItemsCommand {
//!         basket_id: basket.id,
//!         items: vec![AddItemRequest::new(laptop, 1)],
//!     })
//!     .await?;
//!
//! let totals = service.get_total(basket.id).await?;
//! println!("{}", totals.total_with_vat);
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod service;

use tracing_subscriber::EnvFilter;

pub use config::{ConfigError, ServiceConfig};
pub use error::{ServiceError, ServiceResult};
pub use service::BasketService;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,basket=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=basket_service=trace` - Trace for the service only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
