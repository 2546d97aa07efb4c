//! # Dashboard Service
//!
//! Snapshot-then-aggregate driver for the dashboard view.
//!
//! ## Refresh Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Dashboard Refresh                                  │
//! │                                                                         │
//! │  change event ──► watch() wakes ──► refresh()                           │
//! │                                        │                                │
//! │                     ┌──────────────────┤ complete snapshots first       │
//! │                     ▼                  ▼                                │
//! │              products, transactions, expenses (full lists)              │
//! │                     │                                                   │
//! │                     ▼  then pure aggregation (tindera-core)             │
//! │              totals · income chart buckets · today's counts             │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │              DashboardSnapshot (serialized to the frontend)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Aggregation runs strictly after all three snapshots are in hand, never
//! over partial reads. The figures are a pure recomputation each time; a
//! few thousand documents re-aggregate in microseconds and there is no
//! incremental state to drift.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tindera_core::report::{self, DateRange, Granularity};
use tindera_core::{Money, ProductCountReport, ProductStats, RevenueBucket, Transaction};
use tracing::debug;
use ts_rs::TS;

use crate::collection::ChangeSubscription;
use crate::error::StoreResult;
use crate::store::Store;

// =============================================================================
// Presets
// =============================================================================

/// The quick-select buttons above the date pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RangePreset {
    Today,
    ThisWeek,
    ThisMonth,
    Last30Days,
}

impl RangePreset {
    /// Resolves the preset against a clock reading and locale offset.
    pub fn resolve(self, now: DateTime<Utc>, offset: FixedOffset) -> DateRange {
        match self {
            RangePreset::Today => DateRange::today(now, offset),
            RangePreset::ThisWeek => DateRange::this_week(now, offset),
            RangePreset::ThisMonth => DateRange::this_month(now, offset),
            RangePreset::Last30Days => DateRange::last_30_days(now, offset),
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Everything the dashboard view renders, computed in one pass.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardSnapshot {
    #[ts(as = "String")]
    pub generated_at: DateTime<Utc>,

    /// The window the totals and chart cover.
    pub range: DateRange,

    pub total_revenue: Money,
    pub total_expenses: Money,

    /// Revenue minus expenses; may be negative.
    pub net_income: Money,

    /// Income chart points, sorted ascending by period start.
    pub buckets: Vec<RevenueBucket>,

    /// "Products Today" card - always the current calendar day, whatever
    /// the selected window is.
    pub todays_products: ProductCountReport,

    /// Catalog header counts.
    pub product_stats: ProductStats,

    /// Invoices inside the window.
    pub transaction_count: u64,
}

// =============================================================================
// Service
// =============================================================================

/// Dashboard aggregation service.
///
/// Holds the selected window and chart granularity; recomputes a full
/// snapshot on demand. The locale offset is injected at construction, so
/// "today" means the deployment's today rather than the host's.
#[derive(Debug, Clone)]
pub struct Dashboard {
    store: Store,
    offset: FixedOffset,
    range: DateRange,
    granularity: Granularity,
}

impl Dashboard {
    /// Creates a dashboard over the default 30-day window.
    pub fn new(store: Store, offset: FixedOffset) -> Self {
        Dashboard {
            store,
            offset,
            range: DateRange::last_30_days(Utc::now(), offset),
            granularity: Granularity::Day,
        }
    }

    /// The currently selected window.
    pub fn range(&self) -> &DateRange {
        &self.range
    }

    /// Selects an explicit window.
    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
    }

    /// Selects a window via one of the quick presets.
    pub fn apply_preset(&mut self, preset: RangePreset) {
        self.range = preset.resolve(Utc::now(), self.offset);
    }

    /// Selects the income chart granularity.
    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    /// Reads complete snapshots of all three collections and recomputes
    /// every dashboard figure.
    pub async fn refresh(&self) -> StoreResult<DashboardSnapshot> {
        let products = self.store.products().list().await?;
        let transactions = self.store.transactions().list().await?;
        let expenses = self.store.expenses().list().await?;

        let now = Utc::now();
        let in_range: Vec<Transaction> = transactions
            .iter()
            .filter(|tx| tx.finished_at.is_some_and(|ts| self.range.contains(ts)))
            .cloned()
            .collect();

        let snapshot = DashboardSnapshot {
            generated_at: now,
            range: self.range,
            total_revenue: report::total_revenue(&transactions, &self.range),
            total_expenses: report::total_expenses(&expenses, &self.range),
            net_income: report::net_income(&transactions, &expenses, &self.range),
            buckets: report::revenue_buckets(&in_range, self.granularity, self.offset),
            todays_products: report::todays_product_counts(&transactions, self.offset, now),
            product_stats: report::product_stats(&products),
            transaction_count: in_range.len() as u64,
        };

        debug!(
            revenue_cents = snapshot.total_revenue.cents(),
            expense_cents = snapshot.total_expenses.cents(),
            transactions = snapshot.transaction_count,
            "Dashboard snapshot computed"
        );
        Ok(snapshot)
    }

    /// Subscribes to change events across all collections. The caller
    /// re-runs [`refresh`] when an event arrives.
    ///
    /// [`refresh`]: Dashboard::refresh
    pub fn watch(&self) -> ChangeSubscription {
        self.store.subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::ProductForm;
    use crate::store::StoreConfig;
    use tindera_core::InvoiceDraft;

    const MANILA: i32 = 8 * 3600;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(MANILA).expect("valid offset")
    }

    fn form(title: &str, cents: i64) -> ProductForm {
        ProductForm {
            title: title.to_string(),
            details: String::new(),
            price_cents: cents,
            category: None,
            stock: 10,
            barcode: None,
        }
    }

    async fn store() -> Store {
        Store::open(StoreConfig::in_memory())
            .await
            .expect("in-memory store")
    }

    #[tokio::test]
    async fn test_snapshot_totals_and_todays_counts() {
        let store = store().await;
        let consultation = store.products().add(form("Consultation", 12000)).await.unwrap();
        let urinalysis = store.products().add(form("Urinalysis", 8000)).await.unwrap();

        let mut draft = InvoiceDraft::new("Maria Santos");
        draft.add_product(&consultation);
        draft.add_product(&urinalysis);
        draft.set_discount_percent(10.0);
        store.transactions().record(draft).await.unwrap();

        store.expenses().add(5000, "Supplies").await.unwrap();

        let dashboard = Dashboard::new(store, offset());
        let snapshot = dashboard.refresh().await.unwrap();

        assert_eq!(snapshot.total_revenue.cents(), 18000);
        assert_eq!(snapshot.total_expenses.cents(), 5000);
        assert_eq!(snapshot.net_income.cents(), 13000);
        assert_eq!(snapshot.transaction_count, 1);

        assert_eq!(snapshot.todays_products.total, 2);
        assert_eq!(snapshot.todays_products.counts.get("Consultation"), Some(&1));

        assert_eq!(snapshot.product_stats.total, 2);
        assert_eq!(snapshot.product_stats.available, 2);

        assert_eq!(snapshot.buckets.len(), 1);
        assert_eq!(snapshot.buckets[0].total.cents(), 18000);
    }

    #[tokio::test]
    async fn test_out_of_window_invoices_excluded() {
        let store = store().await;
        let product = store.products().add(form("Consultation", 12000)).await.unwrap();

        let old = DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z")
            .expect("test timestamp")
            .with_timezone(&Utc);
        let mut draft = InvoiceDraft::new("Old Customer");
        draft.add_product(&product);
        store.transactions().record_at(draft, old).await.unwrap();

        let dashboard = Dashboard::new(store, offset());
        let snapshot = dashboard.refresh().await.unwrap();

        assert!(snapshot.total_revenue.is_zero());
        assert_eq!(snapshot.transaction_count, 0);
        assert!(snapshot.buckets.is_empty());
        // Nothing was sold today either
        assert_eq!(snapshot.todays_products.total, 0);
    }

    #[tokio::test]
    async fn test_net_income_can_go_negative() {
        let store = store().await;
        store.expenses().add(9000, "Aircon repair").await.unwrap();

        let dashboard = Dashboard::new(store, offset());
        let snapshot = dashboard.refresh().await.unwrap();

        assert_eq!(snapshot.net_income.cents(), -9000);
    }

    #[tokio::test]
    async fn test_explicit_range_overrides_default() {
        let store = store().await;
        let product = store.products().add(form("Consultation", 12000)).await.unwrap();

        let finished_at = DateTime::parse_from_rfc3339("2026-02-14T09:30:00Z")
            .expect("test timestamp")
            .with_timezone(&Utc);
        let mut draft = InvoiceDraft::new("Jose Rizal");
        draft.add_product(&product);
        store.transactions().record_at(draft, finished_at).await.unwrap();

        let mut dashboard = Dashboard::new(store, offset());
        dashboard.set_range(DateRange::new(
            DateTime::parse_from_rfc3339("2026-02-01T00:00:00Z")
                .expect("test timestamp")
                .with_timezone(&Utc),
            DateTime::parse_from_rfc3339("2026-02-28T23:59:59Z")
                .expect("test timestamp")
                .with_timezone(&Utc),
        ));

        let snapshot = dashboard.refresh().await.unwrap();
        assert_eq!(snapshot.total_revenue.cents(), 12000);
        assert_eq!(snapshot.transaction_count, 1);
    }

    #[tokio::test]
    async fn test_watch_wakes_on_any_collection() {
        let store = store().await;
        let dashboard = Dashboard::new(store.clone(), offset());
        let mut watch = dashboard.watch();

        store.expenses().add(100, "taxi").await.unwrap();
        let event = watch.next().await.expect("change event");
        assert_eq!(event.collection, "expenses");
    }
}
