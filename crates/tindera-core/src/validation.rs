//! # Validation Module
//!
//! Input validation for form-submitted records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend form                                                │
//! │  ├── required attributes, numeric inputs                               │
//! │  └── immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (before any write)                               │
//! │  ├── required fields, sign checks, clamping                            │
//! │  └── a failure aborts the operation: no partial write                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store boundary                                               │
//! │  └── lenient coercion of whatever legacy records already contain       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tindera_core::validation::{validate_price, validate_title};
//!
//! validate_title("General Consultation").unwrap();
//! validate_price(30000).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::DiscountRate;
use crate::types::DEFAULT_EXPENSE_NOTE;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Product Fields
// =============================================================================

/// Validates a product title.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use tindera_core::validation::validate_title;
///
/// assert!(validate_title("Complete Blood Count").is_ok());
/// assert!(validate_title("   ").is_err());
/// ```
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::required("title"));
    }

    if title.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a product price in centavos (must not be negative).
pub fn validate_price(price_cents: i64) -> ValidationResult<()> {
    if price_cents < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level (must not be negative).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Invoice Fields
// =============================================================================

/// Validates the customer name on an invoice.
///
/// ## Example
/// ```rust
/// use tindera_core::validation::validate_customer_name;
///
/// assert!(validate_customer_name("Maria Santos").is_ok());
/// assert!(validate_customer_name("").is_err());
/// ```
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::required("customer name"));
    }
    Ok(())
}

/// Validates that an invoice has at least one line item.
pub fn validate_line_item_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::EmptyInvoice);
    }
    Ok(())
}

/// Clamps a raw discount-percent form value into a usable rate.
///
/// The form accepted free numeric text; anything outside 0–100 (or not a
/// number at all) is clamped rather than rejected, matching how checkout
/// has always behaved.
#[inline]
pub fn clamp_discount_percent(percent: f64) -> DiscountRate {
    DiscountRate::from_percent(percent)
}

// =============================================================================
// Expense Fields
// =============================================================================

/// Validates an expense amount (must be strictly positive).
pub fn validate_expense_amount(amount_cents: i64) -> ValidationResult<()> {
    if amount_cents <= 0 {
        return Err(ValidationError::NotPositive {
            field: "amount".to_string(),
        });
    }
    Ok(())
}

/// Normalizes an expense note, substituting the default for blank input.
pub fn normalize_expense_note(note: &str) -> String {
    let note = note.trim();
    if note.is_empty() {
        DEFAULT_EXPENSE_NOTE.to_string()
    } else {
        note.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_rules() {
        assert!(validate_title("X-Ray (Chest)").is_ok());
        assert_eq!(
            validate_title("  "),
            Err(ValidationError::required("title"))
        );
        assert!(validate_title(&"a".repeat(201)).is_err());
    }

    #[test]
    fn test_price_and_stock_signs() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(-1).is_err());
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn test_invoice_rules() {
        assert!(validate_customer_name("Jose").is_ok());
        assert!(validate_customer_name(" \t").is_err());
        assert!(validate_line_item_count(1).is_ok());
        assert_eq!(
            validate_line_item_count(0),
            Err(ValidationError::EmptyInvoice)
        );
    }

    #[test]
    fn test_discount_clamping() {
        assert_eq!(clamp_discount_percent(10.0).bps(), 1000);
        assert_eq!(clamp_discount_percent(250.0).bps(), 10000);
        assert_eq!(clamp_discount_percent(-3.0).bps(), 0);
    }

    #[test]
    fn test_expense_rules() {
        assert!(validate_expense_amount(1).is_ok());
        assert!(validate_expense_amount(0).is_err());
        assert!(validate_expense_amount(-100).is_err());

        assert_eq!(normalize_expense_note(" taxi fare "), "taxi fare");
        assert_eq!(normalize_expense_note(""), "No details");
    }
}
