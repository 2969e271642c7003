//! # Domain Types
//!
//! Core domain types used throughout the basket engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │ BasketLineItem  │   │     Basket      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (ItemId)    │──►│  id (LineItemId)│◄──│  id (BasketId)  │       │
//! │  │  name           │   │  item (copy)    │   │  items          │       │
//! │  │  price (Money)  │   │  quantity ≥ 1   │   │  discount_code  │       │
//! │  └─────────────────┘   │  discount %     │   │  shipping       │       │
//! │                        └─────────────────┘   └────────┬────────┘       │
//! │                                                       │ computed       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │    VatRate      │   │    Shipping     │   │   BasketTotal   │       │
//! │  │  bps (u32)      │   │  country + cost │   │  never stored   │       │
//! │  │  2000 = 20%     │   │  set together   │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A line copies the catalog [`Item`] when it is created. Later catalog price
//! changes never reach an existing line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Percentage};

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random (v4) identifier.
            #[inline]
            pub fn new() -> Self {
                $name(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            #[inline]
            pub const fn from_uuid(id: Uuid) -> Self {
                $name(id)
            }

            /// Returns the wrapped UUID.
            #[inline]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map($name)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                $name(id)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a [`Basket`].
    BasketId
);

uuid_id!(
    /// Identifier of a catalog [`Item`].
    ItemId
);

uuid_id!(
    /// Identifier of one [`BasketLineItem`], fresh per line.
    LineItemId
);

// =============================================================================
// VAT Rate
// =============================================================================

/// VAT rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2000 bps = 20% (UK standard rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatRate(u32);

impl VatRate {
    /// The standard 20% rate.
    pub const STANDARD: VatRate = VatRate(2000);

    /// The largest accepted rate (100%).
    pub const MAX: VatRate = VatRate(10_000);

    /// Creates a VAT rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        VatRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a decimal fraction (0.2000 for 2000 bps).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        VatRate(0)
    }
}

impl Default for VatRate {
    fn default() -> Self {
        VatRate::STANDARD
    }
}

// =============================================================================
// Item
// =============================================================================

/// A catalog entry that can be put in a basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,

    /// Display name.
    pub name: String,

    /// Unit price, never negative.
    pub price: Money,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, price: Money) -> Self {
        Item {
            id,
            name: name.into(),
            price,
        }
    }
}

// =============================================================================
// Add-Item Request
// =============================================================================

/// One entry of an add-items request, exactly as the caller sent it.
///
/// Quantity and percentage are signed so that zero and negative inputs can be
/// reported instead of rejected at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub item_id: ItemId,
    pub quantity: i64,
    #[serde(default)]
    pub is_discounted: bool,
    #[serde(default)]
    pub discount_percentage: Option<i64>,
}

impl AddItemRequest {
    /// A plain request with no per-line discount.
    pub fn new(item_id: ItemId, quantity: i64) -> Self {
        AddItemRequest {
            item_id,
            quantity,
            is_discounted: false,
            discount_percentage: None,
        }
    }

    /// Marks the request as discounted by `percentage`.
    pub fn discounted(mut self, percentage: i64) -> Self {
        self.is_discounted = true;
        self.discount_percentage = Some(percentage);
        self
    }
}

// =============================================================================
// Basket Line Item
// =============================================================================

/// One basket entry: a frozen copy of a catalog item plus quantity and an
/// optional per-line discount.
///
/// A line with quantity zero never exists; removing the last unit removes the
/// line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketLineItem {
    pub id: LineItemId,

    /// Catalog item at the time it was added.
    pub item: Item,

    pub quantity: u32,

    /// Present only when the line is discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Percentage>,
}

impl BasketLineItem {
    /// Creates a new line with a fresh identifier.
    pub fn new(item: Item, quantity: u32, discount: Option<Percentage>) -> Self {
        BasketLineItem {
            id: LineItemId::new(),
            item,
            quantity,
            discount,
        }
    }

    /// Whether this line carries its own discount.
    #[inline]
    pub fn is_discounted(&self) -> bool {
        self.discount.is_some()
    }

    /// The per-line discount, if any.
    #[inline]
    pub fn discount_percentage(&self) -> Option<Percentage> {
        self.discount
    }

    /// Line total after any per-line discount.
    pub fn total_price(&self) -> CoreResult<Money> {
        crate::pricing::line_total(self.item.price, self.quantity, self.discount).ok_or_else(
            || CoreError::QuantityOverflow {
                item_id: self.item.id.to_string(),
            },
        )
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// Shipping destination and the cost quoted for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipping {
    pub country: String,
    pub cost: Money,
}

// =============================================================================
// Basket
// =============================================================================

/// The basket aggregate root.
///
/// ## Invariants
/// - At most one line per catalog item id
/// - Every line has quantity ≥ 1
/// - Shipping country and cost are set together
///
/// Mutations live in [`crate::basket`] and consume `self`, returning the next
/// basket value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basket {
    pub id: BasketId,

    #[serde(default)]
    pub items: Vec<BasketLineItem>,

    /// Basket-level discount code, stored upper-cased.
    #[serde(default)]
    pub discount_code: Option<String>,

    #[serde(default)]
    pub shipping: Option<Shipping>,
}

impl Basket {
    /// Creates an empty basket with a fresh id.
    pub fn new() -> Self {
        Basket::with_id(BasketId::new())
    }

    /// Creates an empty basket with the given id.
    pub fn with_id(id: BasketId) -> Self {
        Basket {
            id,
            items: Vec::new(),
            discount_code: None,
            shipping: None,
        }
    }

    /// Returns true when the basket has no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all lines.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Finds a line by its line id.
    pub fn line(&self, line_id: LineItemId) -> Option<&BasketLineItem> {
        self.items.iter().find(|l| l.id == line_id)
    }

    /// Finds the line holding a given catalog item.
    pub fn line_for_item(&self, item_id: ItemId) -> Option<&BasketLineItem> {
        self.items.iter().find(|l| l.item.id == item_id)
    }

    /// Shipping cost, zero when no shipping has been set.
    pub fn shipping_cost(&self) -> Money {
        self.shipping
            .as_ref()
            .map(|s| s.cost)
            .unwrap_or_else(Money::zero)
    }
}

impl Default for Basket {
    fn default() -> Self {
        Basket::new()
    }
}

// =============================================================================
// Basket Total
// =============================================================================

/// Computed totals for a basket. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketTotal {
    pub basket_id: BasketId,
    pub sub_total: Money,
    pub shipping_cost: Money,
    pub vat_amount: Money,
    pub total_with_vat: Money,
    pub total_without_vat: Money,
    pub total_items: u64,
}

// =============================================================================
// Unit Tests
// =============================================================================
