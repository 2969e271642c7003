//! # Error Types
//!
//! Domain-specific error types for basket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  basket-core errors (this file)                                        │
//! │  ├── CoreError        - Domain failures (not found, bad transition)    │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ErrorCode        - Stable machine-readable code per failure       │
//! │                                                                         │
//! │  basket-db errors (separate crate)                                     │
//! │  └── StoreError       - Catalog / basket store failures                │
//! │                                                                         │
//! │  basket-service errors (app)                                           │
//! │  └── ServiceError     - { code, message } returned by every handler    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError ← StoreError         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Error Code
// =============================================================================

/// Machine-readable failure code shared by every layer.
///
/// Serialized as `snake_case` (`"invalid_quantity"`, `"basket_not_found"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    InvalidQuantity,
    InvalidDiscountPercentage,
    InvalidDiscountCode,
    InvalidShippingCountry,
    ItemNotFound,
    BasketNotFound,
    ServerError,
}

/// Broad classification of an [`ErrorCode`].
///
/// The transport layer maps `Validation` and `NotFound` to client errors and
/// `Infrastructure` to server errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Infrastructure,
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::InvalidQuantity => "invalid_quantity",
            ErrorCode::InvalidDiscountPercentage => "invalid_discount_percentage",
            ErrorCode::InvalidDiscountCode => "invalid_discount_code",
            ErrorCode::InvalidShippingCountry => "invalid_shipping_country",
            ErrorCode::ItemNotFound => "item_not_found",
            ErrorCode::BasketNotFound => "basket_not_found",
            ErrorCode::ServerError => "server_error",
        }
    }

    /// Returns the kind of failure this code represents.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::InvalidRequest
            | ErrorCode::InvalidQuantity
            | ErrorCode::InvalidDiscountPercentage
            | ErrorCode::InvalidDiscountCode
            | ErrorCode::InvalidShippingCountry => ErrorKind::Validation,
            ErrorCode::ItemNotFound | ErrorCode::BasketNotFound => ErrorKind::NotFound,
            ErrorCode::ServerError => ErrorKind::Infrastructure,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent domain failures detected by the aggregate itself. Each
/// variant carries enough context for a log line and maps to one
/// [`ErrorCode`].
#[derive(Debug, Error)]
pub enum CoreError {
    /// A catalog item referenced by a request was not resolved.
    ///
    /// ## When This Occurs
    /// - The catalog has no item with this id
    /// - The handler resolved the batch but a request still references an
    ///   id outside it
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// A basket line with this id does not exist.
    #[error("Basket line not found: {0}")]
    LineNotFound(String),

    /// Basket cannot be found.
    #[error("Basket not found: {0}")]
    BasketNotFound(String),

    /// A line's quantity or amount leaves the supported range: merging
    /// past `u32::MAX`, or `price × quantity` past the decimal range.
    #[error("Quantity overflow for item {item_id}")]
    QuantityOverflow { item_id: String },

    /// The basket's totals leave the decimal range.
    #[error("Totals for basket {basket_id} exceed the supported amount range")]
    TotalOverflow { basket_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the error code surfaced to callers.
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ItemNotFound(_) | CoreError::LineNotFound(_) => ErrorCode::ItemNotFound,
            CoreError::BasketNotFound(_) => ErrorCode::BasketNotFound,
            CoreError::QuantityOverflow { .. } | CoreError::TotalOverflow { .. } => {
                ErrorCode::InvalidQuantity
            }
            CoreError::Validation(e) => e.code(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a command doesn't meet requirements. They are
/// always detected before any collaborator is called.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The add-items request carried no items.
    #[error("At least one item is required")]
    EmptyRequest,

    /// Quantity is zero or negative.
    #[error("Quantity for {item_id} must be positive, got {quantity}")]
    InvalidQuantity { item_id: String, quantity: i64 },

    /// Line marked discounted without a percentage in `1..=100`.
    #[error("Discount percentage for {item_id} must be between 1 and 100, got {percentage:?}")]
    InvalidDiscountPercentage {
        item_id: String,
        percentage: Option<i64>,
    },

    /// Basket-level code is blank or unknown.
    #[error("Discount code '{code}' is not valid")]
    InvalidDiscountCode { code: String },

    /// Shipping country is blank.
    #[error("Shipping country is required")]
    InvalidShippingCountry,
}

impl ValidationError {
    /// Returns the error code surfaced to callers.
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::EmptyRequest => ErrorCode::InvalidRequest,
            ValidationError::InvalidQuantity { .. } => ErrorCode::InvalidQuantity,
            ValidationError::InvalidDiscountPercentage { .. } => {
                ErrorCode::InvalidDiscountPercentage
            }
            ValidationError::InvalidDiscountCode { .. } => ErrorCode::InvalidDiscountCode,
            ValidationError::InvalidShippingCountry => ErrorCode::InvalidShippingCountry,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
