//! # Store Error Types
//!
//! Error types for document store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite error (sqlx::Error) ──┐                                        │
//! │  JSON error (serde_json)    ──┤                                        │
//! │  Validation (tindera-core)  ──┤                                        │
//! │                               ▼                                        │
//! │  StoreError (this module) ← categorized, user-presentable              │
//! │                               │                                        │
//! │                               ▼                                        │
//! │  Caller decides: surface to the frontend or log and retry              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation failures are a distinct variant so callers can tell "you sent
//! bad input" apart from "the store is broken": the first is shown on the
//! form, the second goes to the error banner.

use thiserror::Error;
use tindera_core::ValidationError;

/// Document store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document not found in its collection.
    ///
    /// ## When This Occurs
    /// - Merging or reading a key that was never pushed
    /// - The document was removed by a concurrent writer
    #[error("{collection} document not found: {id}")]
    NotFound { collection: String, id: String },

    /// Input rejected before any write happened.
    ///
    /// A validation failure aborts the whole operation; the store is
    /// untouched.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A document body could not be serialized or deserialized.
    ///
    /// ## When This Occurs
    /// - A stored body is not valid JSON (external tampering)
    /// - A merge patch is not a JSON object
    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A merge patch was not a JSON object.
    ///
    /// Merging replaces top-level keys, so the patch must have top-level
    /// keys to replace with.
    #[error("Merge patch must be a JSON object")]
    InvalidPatch,

    /// The database could not be reached.
    ///
    /// ## When This Occurs
    /// - Database file can't be created (permissions, disk full)
    /// - Pool exhausted or connect timeout elapsed
    #[error("Store connection failed: {0}")]
    Connection(String),

    /// Migration failed on startup.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    Query(String),
}

impl StoreError {
    /// Creates a NotFound error for a collection and document key.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

/// Converts sqlx errors into categorized store errors.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Connection(err.to_string())
            }
            sqlx::Error::Io(_) | sqlx::Error::Configuration(_) => {
                StoreError::Connection(err.to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Migration(err.to_string())
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("products", "abc-123");
        assert_eq!(err.to_string(), "products document not found: abc-123");
    }

    #[test]
    fn test_validation_errors_convert() {
        let err: StoreError = ValidationError::required("title").into();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_sqlx_pool_errors_are_connection() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Connection(_)));

        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::Query(_)));
    }
}
