//! # tindera-core: Pure Business Logic for Tindera POS
//!
//! This crate is the **heart** of Tindera POS. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Tindera POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Web Frontend (React)                        │   │
//! │  │   Catalog ──► Checkout ──► Scanner ──► Dashboard ──► Expenses  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ generated TS types                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tindera-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌────────┐ ┌────────┐ │   │
//! │  │  │  types   │ │  money   │ │  report  │ │  scan  │ │invoice │ │   │
//! │  │  │ Product  │ │  Money   │ │ buckets  │ │resolver│ │ draft  │ │   │
//! │  │  │ Expense  │ │ Discount │ │ revenue  │ │ states │ │ totals │ │   │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TIMERS • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tindera-db (Document Store Layer)               │   │
//! │  │        SQLite documents, change subscriptions, services         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Record types for the three store collections
//! - [`money`] - Integer-centavo money and discount rates (no floats!)
//! - [`report`] - Revenue/expense aggregation and calendar bucketing
//! - [`scan`] - Barcode scan-resolution state machine
//! - [`invoice`] - Checkout drafts and totals
//! - [`validation`] - Form-input validation rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: aggregation is a deterministic recomputation
//!    over a full snapshot - same input, same output
//! 2. **No I/O**: database, network, timers, and clocks are FORBIDDEN
//!    here; callers pass timestamps in
//! 3. **Integer Money**: all amounts are centavos (i64); two-decimal
//!    rounding happens exactly once, in [`money::Money::discount`]
//! 4. **Lenient at the Boundary**: legacy records with stringly amounts
//!    or missing totals are coerced on read, never crashed on
//!
//! ## Example
//!
//! ```rust
//! use chrono::{FixedOffset, Utc};
//! use tindera_core::report::{self, DateRange};
//!
//! let offset = FixedOffset::east_opt(8 * 3600).unwrap(); // Asia/Manila
//! let window = DateRange::last_30_days(Utc::now(), offset);
//!
//! let revenue = report::total_revenue(&[], &window);
//! assert!(revenue.is_zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod money;
pub mod report;
pub mod scan;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tindera_core::Money` instead of
// `use tindera_core::money::Money`

pub use error::ValidationError;
pub use invoice::{InvoiceDraft, InvoiceTotals};
pub use money::{DiscountRate, Money};
pub use report::{DateRange, Granularity, ProductCountReport, ProductStats, RevenueBucket};
pub use scan::{ScanOutcome, ScanResolver, ScanState};
pub use types::{Expense, LineItem, Product, Transaction};
