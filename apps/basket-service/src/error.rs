//! # Service Error Type
//!
//! The single failure type returned by every command handler.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Basket Service                     │
//! │                                                                         │
//! │  Command Handler                                                        │
//! │  Result<T, ServiceError>                                                │
//! │         │                                                               │
//! │         ├── ValidationError ─► invalid_* (before any lookup)           │
//! │         │                                                               │
//! │         ├── CoreError ───────► item_not_found / invalid_quantity       │
//! │         │                                                               │
//! │         ├── StoreError::NotFound ─► basket_not_found / item_not_found  │
//! │         │                                                               │
//! │         └── StoreError (other) ───► server_error  + tracing::error!    │
//! │                                                                         │
//! │  Transport maps ErrorKind: Validation / NotFound → 4xx,                │
//! │                            Infrastructure → 5xx                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! ```json
//! { "code": "invalid_discount_code", "message": "Discount code 'BOGUS' is not valid" }
//! ```

use basket_core::{CoreError, ErrorCode, ErrorKind, ValidationError};
use basket_db::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Error returned from every basket command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code}] {message}")]
pub struct ServiceError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

impl ServiceError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError {
            code,
            message: message.into(),
        }
    }

    /// Broad classification used by the transport layer.
    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::ServerError, message)
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::new(err.code(), err.to_string())
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        ServiceError::new(err.code(), err.to_string())
    }
}

/// Converts store errors to service errors.
///
/// Not-found errors keep the store's code. Anything else is an
/// infrastructure failure: it is logged here and surfaced with a generic
/// message.
impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err.error_code() {
            Some(code) => ServiceError::new(code, err.to_string()),
            None => {
                tracing::error!(error = %err, "Store operation failed");
                ServiceError::internal("Store operation failed")
            }
        }
    }
}

/// Result type for command handlers.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use basket_db::Entity;

    #[test]
    fn test_validation_maps_code() {
        let err: ServiceError = ValidationError::EmptyRequest.into();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_store_not_found_passes_code_through() {
        let err: ServiceError = StoreError::not_found(Entity::Basket, "abc").into();
        assert_eq!(err.code, ErrorCode::BasketNotFound);
        assert_eq!(err.message, "Basket not found: abc");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_store_failure_becomes_server_error() {
        let err: ServiceError = StoreError::QueryFailed("disk I/O error".into()).into();
        assert_eq!(err.code, ErrorCode::ServerError);
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert!(!err.message.contains("disk"));
    }

    #[test]
    fn test_serializes_code_and_message() {
        let err = ServiceError::new(ErrorCode::InvalidDiscountCode, "nope");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "invalid_discount_code");
        assert_eq!(json["message"], "nope");
        assert_eq!(err.to_string(), "[invalid_discount_code] nope");
    }
}
