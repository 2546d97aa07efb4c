//! # Error Types
//!
//! Domain-specific error types for tindera-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tindera-core errors (this file)                                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tindera-db errors (separate crate)                                    │
//! │  └── StoreError       - Document store operation failures              │
//! │                                                                         │
//! │  Flow: ValidationError → StoreError → user-facing string               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The core crate defines validation failures only. The other two negative
//! outcomes of the system are not errors here: a missing document is
//! `StoreError::NotFound` at the store boundary, and a barcode with no
//! matching product is a business-logic negative handled by the scan
//! state machine's `Retrying` state.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, id, etc.)
//! 3. Errors are enum variants, never bare Strings
//! 4. No error is fatal: every failure path returns the caller to an
//!    interactive state

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Surfaced as a blocking prompt in the client; the operation is aborted
/// with no partial write.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A field exceeds its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// A monetary amount that must be positive is zero or negative.
    #[error("{field} must be greater than zero")]
    NotPositive { field: String },

    /// A numeric field that must not be negative is negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// An invoice was submitted with no line items.
    #[error("at least one product is required")]
    EmptyInvoice,
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}
