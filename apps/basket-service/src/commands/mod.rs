//! # Commands Module
//!
//! Command payloads and the handlers that execute them.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every handler follows the same shape:                                  │
//! │                                                                         │
//! │  1. validate command   ── ValidationError ─► invalid_*                  │
//! │  2. load dependencies  ── StoreError::NotFound ─► *_not_found           │
//! │  3. aggregate / pricing (basket-core, pure)                             │
//! │  4. replace basket     ── one write, whole record                       │
//! │  5. Ok(value) | Err(ServiceError)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Commands
//!
//! ### Basket Commands ([`basket`])
//! - `create_basket` - New empty basket
//! - `add_items` - Add or merge lines
//! - `remove_item` - Remove a line, or take units off it
//! - `apply_discount` - Set the basket-level code
//! - `set_shipping` - Set destination and shipping cost
//! - `get_total` - Compute totals
//! - `get_basket` - Read a basket
//!
//! ### Item Commands ([`item`])
//! - `list_items` - The catalog

pub mod basket;
pub mod item;

use basket_core::{AddItemRequest, BasketId, LineItemId};
use serde::{Deserialize, Serialize};

/// Add items to a basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBasketItemsCommand {
    pub basket_id: BasketId,
    #[serde(default)]
    pub items: Vec<AddItemRequest>,
}

/// Remove a basket line.
///
/// `quantity: None` removes the whole line; `Some(n)` takes `n` units off and
/// drops the line once it reaches zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBasketItemCommand {
    pub basket_id: BasketId,
    pub line_id: LineItemId,
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Apply a basket-level discount code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyDiscountCommand {
    pub basket_id: BasketId,
    pub code: String,
}

/// Set the shipping destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetShippingCommand {
    pub basket_id: BasketId,
    pub country: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_items_command_from_json() {
        let json = r#"{
            "basketId": "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa",
            "items": [
                { "itemId": "11111111-1111-1111-1111-111111111111", "quantity": 1 },
                {
                    "itemId": "22222222-2222-2222-2222-222222222222",
                    "quantity": 2,
                    "isDiscounted": true,
                    "discountPercentage": 10
                }
            ]
        }"#;

        let cmd: AddBasketItemsCommand = serde_json::from_str(json).unwrap();
        assert_eq!(cmd.items.len(), 2);
        assert!(!cmd.items[0].is_discounted);
        assert_eq!(cmd.items[1].discount_percentage, Some(10));
    }

    #[test]
    fn test_remove_command_quantity_defaults_to_whole_line() {
        let json = r#"{
            "basketId": "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa",
            "lineId": "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb"
        }"#;

        let cmd: RemoveBasketItemCommand = serde_json::from_str(json).unwrap();
        assert_eq!(cmd.quantity, None);
    }
}
