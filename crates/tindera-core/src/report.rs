//! # Revenue Reporting
//!
//! The aggregation engine behind the dashboard: date-window revenue and
//! expense totals, calendar bucketing for the income chart, and the
//! "products sold today" breakdown.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Dashboard Aggregation Pipeline                      │
//! │                                                                         │
//! │  store snapshot (complete, never partial)                              │
//! │       │                                                                 │
//! │       ├── transactions ──► total_revenue(range) ──┐                    │
//! │       │        │                                  ├──► net_income      │
//! │       ├── expenses ──────► total_expenses(range) ─┘                    │
//! │       │        │                                                        │
//! │       │        └─────────► revenue_buckets(day|week|month)             │
//! │       │                                                                 │
//! │       └── transactions ──► todays_product_counts (calendar day,        │
//! │                            independent of the selected range)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Notes
//! - Every function is a pure recomputation over the full record list.
//!   There is no incremental state: a few thousand records re-aggregate in
//!   microseconds, and purity makes the window filter trivially correct.
//! - Date windows are **closed** intervals: a record stamped exactly at
//!   `start` or `end` is included.
//! - Records with a missing or unparseable timestamp are excluded from all
//!   date-filtered aggregates (the boundary coercion already mapped those
//!   to `None`).
//! - Calendar math happens in an explicit `FixedOffset` so "today" is
//!   well-defined per deployment locale, not wherever the host happens
//!   to run.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Expense, Product, Transaction};

// =============================================================================
// Date Range
// =============================================================================

/// A closed date interval `[start, end]`, both endpoints inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub start: DateTime<Utc>,
    #[ts(as = "String")]
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Creates a range from two endpoints, swapping them if reversed.
    ///
    /// The date pickers clamp each other the same way: choosing an end
    /// before the start collapses rather than errors.
    pub fn new(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        if a <= b {
            DateRange { start: a, end: b }
        } else {
            DateRange { start: b, end: a }
        }
    }

    /// Whether a timestamp falls inside the range (inclusive).
    #[inline]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }

    /// Preset: the current calendar day in `offset`.
    pub fn today(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let day = now.with_timezone(&offset).date_naive();
        DateRange {
            start: day_start(day, offset),
            end: day_end(day, offset),
        }
    }

    /// Preset: Monday of the current week through the end of today.
    pub fn this_week(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let day = now.with_timezone(&offset).date_naive();
        let monday = week_start(day);
        DateRange {
            start: day_start(monday, offset),
            end: day_end(day, offset),
        }
    }

    /// Preset: the first of the current month through the end of today.
    pub fn this_month(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let day = now.with_timezone(&offset).date_naive();
        let first = day.with_day(1).unwrap_or(day);
        DateRange {
            start: day_start(first, offset),
            end: day_end(day, offset),
        }
    }

    /// Preset: the default dashboard window, 30 days back through today.
    pub fn last_30_days(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let day = now.with_timezone(&offset).date_naive();
        DateRange {
            start: day_start(day - Duration::days(30), offset),
            end: day_end(day, offset),
        }
    }
}

/// 00:00:00.000 of `day` in `offset`, as a UTC instant.
fn day_start(day: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let naive = day.and_hms_opt(0, 0, 0).expect("midnight is valid");
    from_local(naive, offset)
}

/// 23:59:59.999 of `day` in `offset`, as a UTC instant.
fn day_end(day: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let naive = day
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("23:59:59.999 is valid");
    from_local(naive, offset)
}

/// Converts a wall-clock time in `offset` to the UTC instant.
fn from_local(naive: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(naive - Duration::seconds(offset.local_minus_utc() as i64), Utc)
}

/// Monday of the week containing `day`.
fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

// =============================================================================
// Totals
// =============================================================================

/// Sums the effective totals of transactions finished inside the window.
///
/// Transactions with no parseable `finishedAt` never count. Empty input
/// yields zero.
pub fn total_revenue(transactions: &[Transaction], range: &DateRange) -> Money {
    transactions
        .iter()
        .filter(|tx| tx.finished_at.is_some_and(|ts| range.contains(ts)))
        .map(Transaction::effective_total)
        .sum()
}

/// Sums expense amounts dated inside the window.
pub fn total_expenses(expenses: &[Expense], range: &DateRange) -> Money {
    expenses
        .iter()
        .filter(|e| e.date.is_some_and(|ts| range.contains(ts)))
        .map(Expense::amount)
        .sum()
}

/// Revenue minus expenses over the window. May be negative.
pub fn net_income(transactions: &[Transaction], expenses: &[Expense], range: &DateRange) -> Money {
    total_revenue(transactions, range) - total_expenses(expenses, range)
}

// =============================================================================
// Calendar Buckets
// =============================================================================

/// Bucketing granularity for the income chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Granularity {
    /// One bucket per calendar date.
    Day,
    /// One bucket per Monday-start week.
    Week,
    /// One bucket per calendar month.
    Month,
}

/// One point on the income chart: a calendar period and its revenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RevenueBucket {
    /// Human-readable period label ("Jan 5, 2026", "Jan 5 - Jan 11, 2026",
    /// "January 2026").
    pub label: String,

    /// First calendar day of the period. Buckets sort on this, never on
    /// insertion order.
    #[ts(as = "String")]
    pub start: NaiveDate,

    /// Summed effective totals of the period's transactions.
    pub total: Money,
}

/// Groups transactions into calendar buckets and sums effective totals.
///
/// ## Contract
/// - Result is sorted ascending by the bucket's start date. The grouping
///   key is a map, so insertion order carries no meaning; sorting is done
///   by keying the accumulator on the period start.
/// - Sparse: periods with no transactions produce no bucket (the chart
///   draws gaps, it does not zero-fill).
/// - Caller filters by window first if a window applies; this function
///   buckets whatever it is given.
pub fn revenue_buckets(
    transactions: &[Transaction],
    granularity: Granularity,
    offset: FixedOffset,
) -> Vec<RevenueBucket> {
    let mut buckets: BTreeMap<NaiveDate, (String, Money)> = BTreeMap::new();

    for tx in transactions {
        let Some(ts) = tx.finished_at else { continue };
        let day = ts.with_timezone(&offset).date_naive();

        let (start, label) = match granularity {
            Granularity::Day => (day, day.format("%b %-d, %Y").to_string()),
            Granularity::Week => {
                let monday = week_start(day);
                let sunday = monday + Duration::days(6);
                let label = format!(
                    "{} - {}",
                    monday.format("%b %-d"),
                    sunday.format("%b %-d, %Y")
                );
                (monday, label)
            }
            Granularity::Month => {
                let first = day.with_day(1).unwrap_or(day);
                (first, day.format("%B %Y").to_string())
            }
        };

        let entry = buckets.entry(start).or_insert_with(|| (label, Money::zero()));
        entry.1 += tx.effective_total();
    }

    buckets
        .into_iter()
        .map(|(start, (label, total))| RevenueBucket {
            label,
            start,
            total,
        })
        .collect()
}

// =============================================================================
// Today's Product Counts
// =============================================================================

/// Per-product sales counts for the current calendar day.
///
/// Backs the "Products Today" card and its breakdown modal. Keys are
/// display names resolved with the line-item precedence rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductCountReport {
    /// Display name → number of line items sold today.
    pub counts: HashMap<String, u64>,

    /// Grand total of line items sold today.
    pub total: u64,
}

impl ProductCountReport {
    /// Entries sorted by count descending (name ascending on ties), the
    /// order the breakdown modal lists them in.
    pub fn sorted_desc(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .counts
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

/// Counts line items from transactions finished on the current calendar
/// day in `offset`.
///
/// Each line item counts once toward its display name. This report is
/// independent of the selected dashboard window: it always covers the
/// full snapshot restricted to today.
pub fn todays_product_counts(
    transactions: &[Transaction],
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> ProductCountReport {
    let today = now.with_timezone(&offset).date_naive();
    let mut report = ProductCountReport::default();

    for tx in transactions {
        let Some(ts) = tx.finished_at else { continue };
        if ts.with_timezone(&offset).date_naive() != today {
            continue;
        }
        for item in &tx.products {
            *report
                .counts
                .entry(item.display_name().to_string())
                .or_default() += 1;
            report.total += 1;
        }
    }

    report
}

// =============================================================================
// Catalog Stats
// =============================================================================

/// Header-card counts for the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductStats {
    pub total: u64,
    pub available: u64,
}

/// Counts catalog products, total and currently available.
pub fn product_stats(products: &[Product]) -> ProductStats {
    ProductStats {
        total: products.len() as u64,
        available: products.iter().filter(|p| p.available).count() as u64,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineItem;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("test timestamp")
            .with_timezone(&Utc)
    }

    fn item(name: &str, cents: i64) -> LineItem {
        LineItem {
            product_id: None,
            product_name: Some(name.to_string()),
            title: None,
            details: String::new(),
            price_cents: cents,
        }
    }

    fn tx(total: Option<i64>, items: Vec<LineItem>, finished_at: Option<&str>) -> Transaction {
        Transaction {
            id: String::new(),
            customer_name: "Test".to_string(),
            products: items,
            subtotal_cents: total,
            discount_percent: 0.0,
            discount_amount_cents: None,
            total_cents: total,
            finished_at: finished_at.map(utc),
        }
    }

    fn expense(cents: i64, date: &str) -> Expense {
        Expense {
            id: String::new(),
            amount_cents: cents,
            note: "test".to_string(),
            date: Some(utc(date)),
        }
    }

    #[test]
    fn test_revenue_includes_boundary_timestamps() {
        let range = DateRange::new(utc("2026-01-10T00:00:00Z"), utc("2026-01-20T23:59:59Z"));
        let txs = vec![
            tx(Some(1000), vec![], Some("2026-01-10T00:00:00Z")), // exactly start
            tx(Some(2000), vec![], Some("2026-01-20T23:59:59Z")), // exactly end
            tx(Some(4000), vec![], Some("2026-01-21T00:00:00Z")), // outside
        ];
        assert_eq!(total_revenue(&txs, &range).cents(), 3000);
    }

    #[test]
    fn test_revenue_is_pure() {
        let range = DateRange::new(utc("2026-01-01T00:00:00Z"), utc("2026-12-31T23:59:59Z"));
        let txs = vec![tx(Some(1234), vec![], Some("2026-06-15T12:00:00Z"))];
        assert_eq!(total_revenue(&txs, &range), total_revenue(&txs, &range));
    }

    #[test]
    fn test_revenue_missing_timestamp_excluded() {
        let range = DateRange::new(utc("2026-01-01T00:00:00Z"), utc("2026-12-31T23:59:59Z"));
        let txs = vec![
            tx(Some(1000), vec![], None),
            tx(Some(500), vec![], Some("2026-06-15T12:00:00Z")),
        ];
        assert_eq!(total_revenue(&txs, &range).cents(), 500);
    }

    #[test]
    fn test_revenue_fallback_to_line_items() {
        let range = DateRange::new(utc("2026-01-01T00:00:00Z"), utc("2026-12-31T23:59:59Z"));
        let txs = vec![tx(
            None,
            vec![item("Soap", 5000), item("Towel", 7500)],
            Some("2026-06-15T12:00:00Z"),
        )];
        assert_eq!(total_revenue(&txs, &range).cents(), 12500);
    }

    #[test]
    fn test_empty_transactions_zero_revenue_no_buckets() {
        let range = DateRange::new(utc("2026-01-01T00:00:00Z"), utc("2026-12-31T23:59:59Z"));
        assert!(total_revenue(&[], &range).is_zero());
        assert!(revenue_buckets(&[], Granularity::Day, FixedOffset::east_opt(0).unwrap()).is_empty());
    }

    #[test]
    fn test_expense_window_filtering() {
        let range = DateRange::new(utc("2026-02-01T00:00:00Z"), utc("2026-02-28T23:59:59Z"));
        let exps = vec![
            expense(10000, "2026-02-10T09:00:00Z"), // inside
            expense(5000, "2026-03-05T09:00:00Z"),  // outside
        ];
        assert_eq!(total_expenses(&exps, &range).cents(), 10000);
    }

    #[test]
    fn test_net_income_may_go_negative() {
        let range = DateRange::new(utc("2026-02-01T00:00:00Z"), utc("2026-02-28T23:59:59Z"));
        let txs = vec![tx(Some(3000), vec![], Some("2026-02-10T10:00:00Z"))];
        let exps = vec![expense(10000, "2026-02-11T10:00:00Z")];
        let net = net_income(&txs, &exps, &range);
        assert_eq!(net.cents(), -7000);
        assert!(net.is_negative());
    }

    /// Day buckets partition total revenue over a covering interval:
    /// no double count, no loss.
    #[test]
    fn test_day_buckets_partition_revenue() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let txs = vec![
            tx(Some(100), vec![], Some("2026-01-05T08:00:00Z")),
            tx(Some(200), vec![], Some("2026-01-05T19:00:00Z")),
            tx(None, vec![item("Soap", 300)], Some("2026-01-07T12:00:00Z")),
            tx(Some(400), vec![], Some("2026-02-01T12:00:00Z")),
        ];
        let covering = DateRange::new(utc("2026-01-05T00:00:00Z"), utc("2026-02-01T23:59:59Z"));

        let buckets = revenue_buckets(&txs, Granularity::Day, offset);
        let bucket_sum: Money = buckets.iter().map(|b| b.total).sum();
        assert_eq!(bucket_sum, total_revenue(&txs, &covering));
        assert_eq!(buckets.len(), 3);
    }

    #[test]
    fn test_buckets_sorted_by_start_not_insertion() {
        let offset = FixedOffset::east_opt(0).unwrap();
        // Deliberately fed newest-first
        let txs = vec![
            tx(Some(300), vec![], Some("2026-03-10T12:00:00Z")),
            tx(Some(100), vec![], Some("2026-01-10T12:00:00Z")),
            tx(Some(200), vec![], Some("2026-02-10T12:00:00Z")),
        ];
        let buckets = revenue_buckets(&txs, Granularity::Month, offset);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["January 2026", "February 2026", "March 2026"]);
    }

    #[test]
    fn test_week_buckets_start_monday() {
        let offset = FixedOffset::east_opt(0).unwrap();
        // 2026-01-05 is a Monday, 2026-01-11 the following Sunday
        let txs = vec![
            tx(Some(100), vec![], Some("2026-01-05T10:00:00Z")),
            tx(Some(200), vec![], Some("2026-01-11T10:00:00Z")),
            tx(Some(400), vec![], Some("2026-01-12T10:00:00Z")), // next Monday
        ];
        let buckets = revenue_buckets(&txs, Granularity::Week, offset);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "Jan 5 - Jan 11, 2026");
        assert_eq!(buckets[0].total.cents(), 300);
        assert_eq!(buckets[1].total.cents(), 400);
    }

    #[test]
    fn test_day_label_format() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let txs = vec![tx(Some(100), vec![], Some("2026-01-05T10:00:00Z"))];
        let buckets = revenue_buckets(&txs, Granularity::Day, offset);
        assert_eq!(buckets[0].label, "Jan 5, 2026");
    }

    #[test]
    fn test_bucket_day_respects_offset() {
        // 2026-01-05T22:00:00Z is already Jan 6 at +08:00
        let manila = FixedOffset::east_opt(8 * 3600).unwrap();
        let txs = vec![tx(Some(100), vec![], Some("2026-01-05T22:00:00Z"))];
        let buckets = revenue_buckets(&txs, Granularity::Day, manila);
        assert_eq!(buckets[0].start, NaiveDate::from_ymd_opt(2026, 1, 6).unwrap());
    }

    #[test]
    fn test_todays_product_counts() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let now = utc("2026-01-05T15:00:00Z");
        let txs = vec![
            tx(
                None,
                vec![item("Soap", 5000), item("Soap", 5000), item("Towel", 7500)],
                Some("2026-01-05T09:00:00Z"),
            ),
            // Yesterday: must not count
            tx(None, vec![item("Soap", 5000)], Some("2026-01-04T09:00:00Z")),
            // No timestamp: must not count
            tx(None, vec![item("Soap", 5000)], None),
        ];

        let report = todays_product_counts(&txs, offset, now);
        assert_eq!(report.total, 3);
        assert_eq!(report.counts.get("Soap"), Some(&2));
        assert_eq!(report.counts.get("Towel"), Some(&1));

        let sorted = report.sorted_desc();
        assert_eq!(sorted[0], ("Soap".to_string(), 2));
    }

    #[test]
    fn test_todays_counts_unknown_product_fallback() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let now = utc("2026-01-05T15:00:00Z");
        let nameless = LineItem {
            product_id: None,
            product_name: None,
            title: None,
            details: String::new(),
            price_cents: 100,
        };
        let txs = vec![tx(None, vec![nameless], Some("2026-01-05T09:00:00Z"))];
        let report = todays_product_counts(&txs, offset, now);
        assert_eq!(report.counts.get("Unknown Product"), Some(&1));
    }

    #[test]
    fn test_date_range_swaps_reversed_endpoints() {
        let a = utc("2026-01-20T00:00:00Z");
        let b = utc("2026-01-10T00:00:00Z");
        let range = DateRange::new(a, b);
        assert!(range.start < range.end);
        assert!(range.contains(utc("2026-01-15T00:00:00Z")));
    }

    #[test]
    fn test_presets() {
        let manila = FixedOffset::east_opt(8 * 3600).unwrap();
        // Thursday 2026-01-08, 10:00 Manila time
        let now = utc("2026-01-08T02:00:00Z");

        let today = DateRange::today(now, manila);
        assert!(today.contains(now));
        // Midnight Manila = 16:00 UTC previous day
        assert_eq!(today.start, utc("2026-01-07T16:00:00Z"));

        let week = DateRange::this_week(now, manila);
        // Monday 2026-01-05 00:00 Manila
        assert_eq!(week.start, utc("2026-01-04T16:00:00Z"));

        let month = DateRange::this_month(now, manila);
        assert_eq!(month.start, utc("2025-12-31T16:00:00Z"));

        let month_back = DateRange::last_30_days(now, manila);
        assert!(month_back.contains(utc("2025-12-15T00:00:00Z")));
        assert!(!month_back.contains(utc("2025-12-01T00:00:00Z")));
    }

    #[test]
    fn test_product_stats() {
        let make = |available: bool| Product {
            id: String::new(),
            title: "P".to_string(),
            details: String::new(),
            price_cents: 100,
            category: None,
            stock: 1,
            barcode: None,
            available,
            created_at: None,
            updated_at: None,
        };
        let products = vec![make(true), make(false), make(true)];
        let stats = product_stats(&products);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.available, 2);
    }
}
