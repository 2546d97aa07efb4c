//! # Invoice Building
//!
//! The checkout flow: selected products accumulate in a draft, a discount
//! is applied, and finalizing produces the immutable [`Transaction`]
//! written to the store.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Invoice Checkout                                 │
//! │                                                                         │
//! │  click product ──► add_product() ──► line-item snapshot frozen          │
//! │  click ×       ──► remove_item()                                        │
//! │  type percent  ──► set_discount_percent() (clamped 0-100)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  finalize(now)                                                          │
//! │  ├── validate: customer name present, ≥1 line item                      │
//! │  ├── subtotal = Σ line-item prices                                      │
//! │  ├── discount = round(subtotal × pct/100) to the centavo                │
//! │  └── total    = subtotal − discount                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Transaction (immutable; no update/delete path exists)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{DiscountRate, Money};
use crate::types::{LineItem, Product, Transaction};
use crate::validation::{self, ValidationResult};

// =============================================================================
// Draft
// =============================================================================

/// An in-progress invoice. Line items are frozen product snapshots:
/// catalog edits after a product is added do not change the draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceDraft {
    pub customer_name: String,
    pub items: Vec<LineItem>,
    /// Raw form value; clamped to 0–100 at finalize time.
    pub discount_percent: f64,
}

/// Computed money columns of a draft, for live display at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub discount_amount: Money,
    pub total: Money,
}

impl InvoiceDraft {
    /// Creates an empty draft for a customer.
    pub fn new(customer_name: impl Into<String>) -> Self {
        InvoiceDraft {
            customer_name: customer_name.into(),
            items: Vec::new(),
            discount_percent: 0.0,
        }
    }

    /// Freezes a catalog product into the draft. The same product may be
    /// added more than once; each click is its own line item.
    pub fn add_product(&mut self, product: &Product) {
        self.items.push(LineItem::from_product(product));
    }

    /// Removes the line item at `index`, if it exists.
    pub fn remove_item(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    /// Sets the raw discount percentage (clamped when totals are computed).
    pub fn set_discount_percent(&mut self, percent: f64) {
        self.discount_percent = percent;
    }

    /// Sum of the line-item prices.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::price).sum()
    }

    /// The clamped discount rate.
    pub fn discount_rate(&self) -> DiscountRate {
        validation::clamp_discount_percent(self.discount_percent)
    }

    /// Subtotal, discount amount, and total under the current rate.
    pub fn totals(&self) -> InvoiceTotals {
        let subtotal = self.subtotal();
        let discount_amount = subtotal.discount(self.discount_rate());
        InvoiceTotals {
            subtotal,
            discount_amount,
            total: subtotal - discount_amount,
        }
    }

    /// Checks the draft is submittable: customer name present and at
    /// least one line item. A failure aborts checkout with no write.
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_customer_name(&self.customer_name)?;
        validation::validate_line_item_count(self.items.len())?;
        Ok(())
    }

    /// Validates and converts the draft into the transaction record.
    ///
    /// The resulting record is complete: later readers never recompute
    /// totals from a finalized invoice (only legacy records lack them).
    pub fn finalize(self, finished_at: DateTime<Utc>) -> ValidationResult<Transaction> {
        self.validate()?;

        let rate = self.discount_rate();
        let totals = self.totals();

        Ok(Transaction {
            id: String::new(),
            customer_name: self.customer_name.trim().to_string(),
            products: self.items,
            subtotal_cents: Some(totals.subtotal.cents()),
            discount_percent: rate.percent(),
            discount_amount_cents: Some(totals.discount_amount.cents()),
            total_cents: Some(totals.total.cents()),
            finished_at: Some(finished_at),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn product(title: &str, cents: i64) -> Product {
        Product {
            id: format!("id-{title}"),
            title: title.to_string(),
            details: String::new(),
            price_cents: cents,
            category: None,
            stock: 1,
            barcode: None,
            available: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-05T10:00:00Z")
            .expect("test timestamp")
            .with_timezone(&Utc)
    }

    /// Subtotal ₱200, 10% discount → discount ₱20.00, total ₱180.00.
    #[test]
    fn test_discount_invariant_on_finalize() {
        let mut draft = InvoiceDraft::new("Maria");
        draft.add_product(&product("Consultation", 12000));
        draft.add_product(&product("Urinalysis", 8000));
        draft.set_discount_percent(10.0);

        let tx = draft.finalize(now()).expect("valid draft");
        assert_eq!(tx.subtotal_cents, Some(20000));
        assert_eq!(tx.discount_amount_cents, Some(2000));
        assert_eq!(tx.total_cents, Some(18000));
        assert_eq!(tx.effective_total().cents(), 18000);
        assert!(tx.finished_at.is_some());
    }

    #[test]
    fn test_discount_clamped_at_finalize() {
        let mut draft = InvoiceDraft::new("Maria");
        draft.add_product(&product("Consultation", 10000));
        draft.set_discount_percent(500.0);

        let tx = draft.finalize(now()).expect("valid draft");
        assert_eq!(tx.discount_percent, 100.0);
        assert_eq!(tx.total_cents, Some(0));
    }

    #[test]
    fn test_missing_customer_name_rejected() {
        let mut draft = InvoiceDraft::new("  ");
        draft.add_product(&product("Consultation", 10000));
        assert_eq!(
            draft.finalize(now()).unwrap_err(),
            ValidationError::required("customer name")
        );
    }

    #[test]
    fn test_empty_draft_rejected() {
        let draft = InvoiceDraft::new("Maria");
        assert_eq!(
            draft.finalize(now()).unwrap_err(),
            ValidationError::EmptyInvoice
        );
    }

    #[test]
    fn test_same_product_twice_is_two_line_items() {
        let mut draft = InvoiceDraft::new("Maria");
        let p = product("Soap", 5000);
        draft.add_product(&p);
        draft.add_product(&p);
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.subtotal().cents(), 10000);
    }

    #[test]
    fn test_remove_item() {
        let mut draft = InvoiceDraft::new("Maria");
        draft.add_product(&product("Soap", 5000));
        draft.add_product(&product("Towel", 7500));

        draft.remove_item(0);
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.subtotal().cents(), 7500);

        // Out-of-range removal is a no-op
        draft.remove_item(5);
        assert_eq!(draft.items.len(), 1);
    }

    #[test]
    fn test_snapshot_is_frozen() {
        let mut draft = InvoiceDraft::new("Maria");
        let mut p = product("Soap", 5000);
        draft.add_product(&p);

        // Catalog price change after adding must not affect the draft
        p.price_cents = 9999;
        assert_eq!(draft.subtotal().cents(), 5000);
    }
}
