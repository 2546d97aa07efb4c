//! # Domain Types
//!
//! Core record types for Tindera POS: the three store collections and the
//! line-item snapshot embedded in transactions.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Store Collections                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  Transaction    │   │    Expense      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (key)       │   │  id (key)       │   │  id (key)       │       │
//! │  │  title          │   │  customerName   │   │  amountCents    │       │
//! │  │  priceCents     │   │  products[]     │   │  note           │       │
//! │  │  barcode?       │   │  totalCents?    │   │  date           │       │
//! │  │  available      │   │  finishedAt     │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                        ┌─────────────────┐                              │
//! │                        │   LineItem      │  snapshot of the product     │
//! │                        │  productName?   │  at checkout time; NOT a     │
//! │                        │  title? (legacy)│  live link to the catalog    │
//! │                        │  priceCents     │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Legacy Coercion at the Store Boundary
//! The previous client wrote loosely-typed records: amounts sometimes as
//! strings, `total` occasionally missing, timestamps as either RFC 3339
//! strings or epoch milliseconds. Deserialization coerces all of that here,
//! once, so downstream code only ever sees well-typed fields:
//!
//! - amounts: number or numeric string → centavos; anything else → `None`
//!   (or 0 where the field is required)
//! - timestamps: RFC 3339 or epoch millis → `DateTime<Utc>`; otherwise `None`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Display name used when a line item carries no usable product name.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// Note recorded for an expense submitted without one.
pub const DEFAULT_EXPENSE_NOTE: &str = "No details";

// =============================================================================
// Product
// =============================================================================

/// A product (or clinic service) in the catalog.
///
/// Records are mutated by full edit-form resubmission or the availability
/// toggle, and deleted explicitly. No versioning; last write wins.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Store-assigned key. Absent inside the document body; the data
    /// access layer fills it in from the key on read.
    #[serde(default)]
    pub id: String,

    /// Display title shown on the sales grid and receipts.
    pub title: String,

    /// Free-text description.
    #[serde(default)]
    pub details: String,

    /// Price in centavos (non-negative).
    #[serde(default, deserialize_with = "de::cents_or_zero")]
    pub price_cents: i64,

    /// Optional category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Units in stock (informational; sales do not decrement it).
    #[serde(default)]
    pub stock: i64,

    /// Optional barcode. Not guaranteed unique; scan lookup takes the
    /// first match in list order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    /// Whether the product can currently be added to an invoice.
    #[serde(default = "de::default_true")]
    pub available: bool,

    #[serde(default, deserialize_with = "de::opt_timestamp")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "de::opt_timestamp")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Case-insensitive search over title and details.
    ///
    /// Used by the sales page product filter. An empty query matches
    /// everything.
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&q) || self.details.to_lowercase().contains(&q)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A product snapshot embedded in a transaction at checkout time.
///
/// ## Snapshot Pattern
/// `product_id` is informational only: later edits or deletion of the
/// catalog record never alter a recorded invoice.
///
/// ## Name Precedence
/// Legacy records stored the name under `title` rather than
/// `productName`. Resolution order is fixed:
/// `product_name` → `title` → `"Unknown Product"`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Catalog key at checkout time, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    /// Product name at checkout time (frozen).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    /// Legacy alias for the product name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Details at checkout time (frozen).
    #[serde(default)]
    pub details: String,

    /// Price in centavos at checkout time (frozen).
    #[serde(default, deserialize_with = "de::cents_or_zero")]
    pub price_cents: i64,
}

impl LineItem {
    /// Freezes a catalog product into a line item.
    pub fn from_product(product: &Product) -> Self {
        LineItem {
            product_id: Some(product.id.clone()),
            product_name: Some(product.title.clone()),
            title: None,
            details: product.details.clone(),
            price_cents: product.price_cents,
        }
    }

    /// Returns the frozen price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Resolves the display name with the documented precedence.
    pub fn display_name(&self) -> &str {
        self.product_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.title.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(UNKNOWN_PRODUCT_NAME)
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A finalized invoice. Created once at checkout, immutable thereafter:
/// there is no update or delete path.
///
/// ## Totals Invariant
/// `total = round(subtotal × (1 − discountPercent/100), 2)` — enforced at
/// creation via [`Money::discount`]. Legacy records may lack `totalCents`
/// entirely; consumers must go through [`Transaction::effective_total`]
/// rather than reading the field directly.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Transaction {
    /// Store-assigned key (filled in from the key on read).
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub customer_name: String,

    /// Line-item snapshots. May be empty or missing in malformed records.
    #[serde(default)]
    pub products: Vec<LineItem>,

    /// Sum of line-item prices at checkout time.
    #[serde(default, deserialize_with = "de::opt_cents")]
    pub subtotal_cents: Option<i64>,

    /// Discount percentage, clamped to 0–100 at creation.
    #[serde(default)]
    pub discount_percent: f64,

    /// Derived discount amount, rounded to the centavo.
    #[serde(default, deserialize_with = "de::opt_cents")]
    pub discount_amount_cents: Option<i64>,

    /// Final total. Absent in legacy records.
    #[serde(default, deserialize_with = "de::opt_cents")]
    pub total_cents: Option<i64>,

    /// Checkout timestamp. Records without one are excluded from every
    /// date-filtered aggregate.
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    #[ts(as = "Option<String>")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Sum of the line-item prices (0 for an empty or missing list).
    pub fn line_item_sum(&self) -> Money {
        self.products.iter().map(LineItem::price).sum()
    }

    /// The revenue this transaction contributes.
    ///
    /// Precedence: the stored `totalCents` when present, otherwise the
    /// line-item sum, otherwise zero. A record with a `totalCents` but a
    /// malformed product list still counts via its total.
    pub fn effective_total(&self) -> Money {
        match self.total_cents {
            Some(cents) => Money::from_cents(cents),
            None => self.line_item_sum(),
        }
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A recorded expense. Created via form and deleted explicitly; never
/// updated.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Expense {
    /// Store-assigned key (filled in from the key on read).
    #[serde(default)]
    pub id: String,

    /// Amount in centavos. Positive for well-formed records; legacy
    /// garbage coerces to 0 and contributes nothing to totals.
    #[serde(default, deserialize_with = "de::cents_or_zero")]
    pub amount_cents: i64,

    /// Free-text note; defaults to "No details" at creation.
    #[serde(default)]
    pub note: String,

    /// When the expense occurred (defaults to creation time).
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    #[ts(as = "Option<String>")]
    pub date: Option<DateTime<Utc>>,
}

impl Expense {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Lenient Deserialization Helpers
// =============================================================================

/// Boundary coercion for loosely-typed legacy fields.
mod de {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn default_true() -> bool {
        true
    }

    /// Coerces a JSON value to centavos, if it is numeric at all.
    fn value_to_cents(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.round() as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
            }
            _ => None,
        }
    }

    /// Number, numeric string, or anything else → `Option<i64>`.
    pub fn opt_cents<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(value_to_cents))
    }

    /// Like [`opt_cents`], but non-numeric input becomes 0.
    pub fn cents_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(value_to_cents).unwrap_or(0))
    }

    /// RFC 3339 string or epoch milliseconds → `Option<DateTime<Utc>>`.
    /// Unparseable timestamps become `None`, which excludes the record
    /// from date-filtered aggregates instead of failing the whole read.
    pub fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            _ => None,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
