//! # Validation Module
//!
//! Input validation for basket commands.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Order                                   │
//! │                                                                         │
//! │  Step 1: Command shape (THIS MODULE)                                   │
//! │  ├── empty item list, quantity ≤ 0, discount % outside 1..=100         │
//! │  ├── blank / unknown discount code, blank shipping country             │
//! │  └── NO collaborator has been called yet                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Step 2: Lookups (basket-service)                                      │
//! │  ├── basket exists?           → basket_not_found                       │
//! │  └── every item in catalog?   → item_not_found                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Step 3: Aggregate transition (basket module)                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use basket_core::types::{AddItemRequest, ItemId};
//! use basket_core::validation::validate_add_requests;
//!
//! let lines = validate_add_requests(&[AddItemRequest::new(ItemId::new(), 2)]).unwrap();
//! assert_eq!(lines[0].quantity(), 2);
//!
//! assert!(validate_add_requests(&[]).is_err());
//! ```

use crate::discount::{normalize_code, DiscountCodes};
use crate::error::ValidationError;
use crate::money::Percentage;
use crate::types::{AddItemRequest, ItemId, LineItemId};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Validated Line Request
// =============================================================================

/// An add-item request that has passed validation.
///
/// Only [`validate_add_requests`] builds these, so the aggregate can rely on
/// `quantity ≥ 1` and a well-formed discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRequest {
    item_id: ItemId,
    quantity: u32,
    discount: Option<Percentage>,
}

impl LineRequest {
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn discount(&self) -> Option<Percentage> {
        self.discount
    }
}

// =============================================================================
// Add Items
// =============================================================================

/// Validates every entry of an add-items request.
///
/// ## Rules
/// - At least one entry
/// - Each quantity positive and representable as `u32`
/// - A discounted entry needs a percentage in `1..=100`
///
/// The first failing entry decides the error.
pub fn validate_add_requests(requests: &[AddItemRequest]) -> ValidationResult<Vec<LineRequest>> {
    if requests.is_empty() {
        return Err(ValidationError::EmptyRequest);
    }

    requests
        .iter()
        .map(|req| -> ValidationResult<LineRequest> {
            let quantity = validate_quantity(req.item_id, req.quantity)?;
            let discount = if req.is_discounted {
                Some(validate_line_discount(req.item_id, req.discount_percentage)?)
            } else {
                None
            };

            Ok(LineRequest {
                item_id: req.item_id,
                quantity,
                discount,
            })
        })
        .collect()
}

/// Validates a requested quantity.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Add item to basket: quantity 2                                         │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(item, 2) ← THIS FUNCTION                            │
/// │       │                                                                 │
/// │       ├── qty <= 0? → invalid_quantity                                 │
/// │       │                                                                 │
/// │       └── OK → 2u32                                                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(item_id: ItemId, quantity: i64) -> ValidationResult<u32> {
    if quantity <= 0 {
        return Err(invalid_quantity(item_id, quantity));
    }
    u32::try_from(quantity).map_err(|_| invalid_quantity(item_id, quantity))
}

/// Validates the percentage of a line marked as discounted.
///
/// Zero is rejected here even though [`Percentage`] allows it: a discounted
/// line must actually discount.
pub fn validate_line_discount(
    item_id: ItemId,
    percentage: Option<i64>,
) -> ValidationResult<Percentage> {
    percentage
        .filter(|p| *p > 0)
        .and_then(|p| Percentage::try_from(p).ok())
        .ok_or_else(|| ValidationError::InvalidDiscountPercentage {
            item_id: item_id.to_string(),
            percentage,
        })
}

/// Validates the number of units to take off a line.
pub fn validate_decrement(line_id: LineItemId, amount: u32) -> ValidationResult<u32> {
    if amount == 0 {
        return Err(invalid_quantity(line_id, 0));
    }
    Ok(amount)
}

fn invalid_quantity(id: impl ToString, quantity: i64) -> ValidationError {
    ValidationError::InvalidQuantity {
        item_id: id.to_string(),
        quantity,
    }
}

// =============================================================================
// Discount Code & Shipping
// =============================================================================

/// Validates a basket-level code against `codes`.
///
/// ## Returns
/// The normalized code and the percentage it grants.
///
/// ## Example
/// ```rust
/// use basket_core::StaticDiscountCodes;
/// use basket_core::validation::validate_discount_code;
///
/// let codes = StaticDiscountCodes::default();
/// let (code, pct) = validate_discount_code(" save20", &codes).unwrap();
/// assert_eq!(code, "SAVE20");
/// assert_eq!(pct.value(), 20);
///
/// assert!(validate_discount_code("", &codes).is_err());
/// ```
pub fn validate_discount_code(
    code: &str,
    codes: &dyn DiscountCodes,
) -> ValidationResult<(String, Percentage)> {
    let invalid = || ValidationError::InvalidDiscountCode {
        code: code.to_string(),
    };

    let normalized = normalize_code(code).ok_or_else(invalid)?;
    let pct = codes.resolve(&normalized).ok_or_else(invalid)?;
    Ok((normalized, pct))
}

/// Validates a shipping country.
///
/// ## Returns
/// The trimmed country name.
pub fn validate_shipping_country(country: &str) -> ValidationResult<&str> {
    let country = country.trim();
    if country.is_empty() {
        return Err(ValidationError::InvalidShippingCountry);
    }
    Ok(country)
}

// =============================================================================
// Unit Tests
// =============================================================================
