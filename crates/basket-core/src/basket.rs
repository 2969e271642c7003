//! # Basket Aggregate Transitions
//!
//! Every mutation consumes the current [`Basket`] and returns the next one.
//! A failed transition leaves the caller's last stored value untouched, so a
//! half-applied basket never reaches the store.
//!
//! ## Add / Merge Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validated requests + resolved catalog items                            │
//! │       │                                                                 │
//! │       ├── any item not resolved? ──► item_not_found (nothing applied)   │
//! │       │                                                                 │
//! │       ▼  for each request, in order                                     │
//! │  line for item exists?                                                  │
//! │       ├── yes ──► quantity += requested, discount overwritten           │
//! │       └── no  ──► new line, fresh LineItemId, item copied               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total ceiling fits? ──no──► invalid_quantity (nothing applied)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::pricing::total_ceiling;
use crate::types::{Basket, BasketLineItem, Item, ItemId, LineItemId, Shipping};
use crate::validation::{validate_decrement, LineRequest};

impl Basket {
    /// Adds items, merging into existing lines for the same catalog item.
    ///
    /// `resolved` must hold every item referenced by `requests`. The same item
    /// twice in one call merges quantities and keeps the last request's
    /// discount. A result whose totals could leave the decimal range is
    /// rejected, so a stored basket can always be totalled.
    pub fn add_or_merge_items(
        mut self,
        requests: &[LineRequest],
        resolved: &HashMap<ItemId, Item>,
    ) -> CoreResult<Basket> {
        if requests.is_empty() {
            return Err(ValidationError::EmptyRequest.into());
        }

        if let Some(missing) = requests
            .iter()
            .find(|req| !resolved.contains_key(&req.item_id()))
        {
            return Err(CoreError::ItemNotFound(missing.item_id().to_string()));
        }

        for req in requests {
            let item_id = req.item_id();
            match self.items.iter().position(|line| line.item.id == item_id) {
                Some(index) => {
                    let line = &mut self.items[index];
                    line.quantity = line.quantity.checked_add(req.quantity()).ok_or_else(|| {
                        CoreError::QuantityOverflow {
                            item_id: item_id.to_string(),
                        }
                    })?;
                    line.discount = req.discount();
                }
                None => {
                    let item = resolved
                        .get(&item_id)
                        .cloned()
                        .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;
                    self.items
                        .push(BasketLineItem::new(item, req.quantity(), req.discount()));
                }
            }
        }

        total_ceiling(&self)?;
        Ok(self)
    }

    /// Removes a line entirely. Removing the last line leaves an empty basket.
    pub fn remove_line(mut self, line_id: LineItemId) -> CoreResult<Basket> {
        let index = self.line_index(line_id)?;
        self.items.remove(index);
        Ok(self)
    }

    /// Takes `amount` units off a line, dropping the line when none are left.
    pub fn decrement_line(mut self, line_id: LineItemId, amount: u32) -> CoreResult<Basket> {
        let amount = validate_decrement(line_id, amount)?;
        let index = self.line_index(line_id)?;

        let line = &mut self.items[index];
        if line.quantity <= amount {
            self.items.remove(index);
        } else {
            line.quantity -= amount;
        }
        Ok(self)
    }

    /// Sets the basket-level code, replacing any previous one.
    ///
    /// The code should already be validated and normalized.
    pub fn with_discount_code(mut self, code: impl Into<String>) -> Basket {
        self.discount_code = Some(code.into());
        self
    }

    /// Sets the shipping destination and cost together.
    pub fn with_shipping(mut self, shipping: Shipping) -> Basket {
        self.shipping = Some(shipping);
        self
    }

    fn line_index(&self, line_id: LineItemId) -> CoreResult<usize> {
        self.items
            .iter()
            .position(|line| line.id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
