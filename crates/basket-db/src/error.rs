//! # Store Error Types
//!
//! Error types for catalog and basket store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / serde_json::Error / lookup miss                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ├── error_code() = Some(..)  not-found, code passed through      │
//! │       └── error_code() = None      infrastructure, becomes server_error│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError (basket-service)                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use basket_core::ErrorCode;
use std::fmt;
use thiserror::Error;

/// Kind of record a store lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Item,
    Basket,
    /// A row that sqlx reported missing without further context.
    Record,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Item => "Item",
            Entity::Basket => "Basket",
            Entity::Record => "Record",
        };
        f.write_str(name)
    }
}

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in the store.
    ///
    /// ## When This Occurs
    /// - Unknown item id in the catalog
    /// - Unknown basket id on `get` or `replace`
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Pool is closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored document or column could not be decoded (or encoded).
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// A catalog item breaks a catalog rule (e.g. a negative price).
    #[error("Invalid item {id}: {reason}")]
    InvalidItem { id: String, reason: String },

    /// Internal store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity and id.
    pub fn not_found(entity: Entity, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// The caller-facing code this error carries, if it has one.
    ///
    /// Only not-found errors carry a code; every other failure is surfaced
    /// as `server_error` by the service layer.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            StoreError::NotFound {
                entity: Entity::Item,
                ..
            } => Some(ErrorCode::ItemNotFound),
            StoreError::NotFound {
                entity: Entity::Basket,
                ..
            } => Some(ErrorCode::BasketNotFound),
            _ => None,
        }
    }

    /// Whether this is a lookup miss rather than a store failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → StoreError::NotFound (Record)
/// sqlx::Error::Database       → StoreError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StoreError::ConnectionFailed
/// sqlx::Error::PoolClosed     → StoreError::ConnectionFailed
/// sqlx::Error::ColumnDecode   → StoreError::Serialization
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::not_found(Entity::Record, "unknown"),
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => {
                StoreError::ConnectionFailed("Connection pool exhausted".to_string())
            }
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Serialization(err.to_string())
            }
            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<uuid::Error> for StoreError {
    fn from(err: uuid::Error) -> Self {
        StoreError::Serialization(format!("invalid stored id: {err}"))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
