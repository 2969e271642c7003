//! # basket-core: Pure Business Logic for the Basket Engine
//!
//! This crate is the **heart** of the basket engine. It contains the basket
//! aggregate, the pricing calculator and the discount-code table as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Basket Engine Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Transport (external)                         │   │
//! │  │    POST /baskets ──► POST /items ──► GET /total                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                basket-service (command handlers)                │   │
//! │  │    create_basket, add_items, apply_discount, get_total, ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ basket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  basket   │  │  pricing  │  │   │
//! │  │   │   Item    │  │   Money   │  │  Basket   │  │ line/sub  │  │   │
//! │  │   │  VatRate  │  │Percentage │  │ add/merge │  │  totals   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    basket-db (Storage Layer)                    │   │
//! │  │          item catalog, basket repository, migrations            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, BasketLineItem, Basket, BasketTotal)
//! - [`money`] - Fixed-point `Money` and `Percentage`
//! - [`discount`] - Basket-level discount-code table
//! - [`pricing`] - Line totals, subtotal and VAT
//! - [`basket`] - Aggregate transitions (add/merge, remove, discount, shipping)
//! - [`shipping`] - Shipping cost policy
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types and error codes
//!
//! ## Example Usage
//!
//! ```rust
//! use basket_core::money::Money;
//! use basket_core::types::VatRate;
//!
//! let subtotal = Money::from_str_exact("1054.00").unwrap();
//! let vat = subtotal.calculate_tax(VatRate::STANDARD);
//!
//! assert_eq!(vat, Some(Money::from_str_exact("210.80").unwrap()));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod discount;
pub mod error;
pub mod money;
pub mod pricing;
pub mod shipping;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{DiscountCodes, StaticDiscountCodes};
pub use error::{CoreError, ErrorCode, ErrorKind, ValidationError};
pub use money::{Money, Percentage};
pub use shipping::ShippingPolicy;
pub use types::*;
