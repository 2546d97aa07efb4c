//! # Scan Resolution
//!
//! The state machine behind the barcode scanner page: decoded strings come
//! in from a camera feed many times per second, and exactly one lookup per
//! distinct code must reach the catalog.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Scan Resolution States                           │
//! │                                                                         │
//! │                    new code (≠ last scanned)                           │
//! │   ┌──────────┐ ───────────────────────────────► lookup                 │
//! │   │ Scanning │                                    │                    │
//! │   └──────────┘ ◄──────────────┐          ┌────────┴────────┐           │
//! │     ▲    ▲                    │          ▼                 ▼           │
//! │     │    │              retry_elapsed  match          no match /       │
//! │     │    │              (clears last   │              store error      │
//! │     │    │               scanned)      ▼                 │             │
//! │     │    │                    │   ┌─────────┐      ┌───────────┐      │
//! │     │    └────────────────────┴── │ Matched │      │ Retrying  │      │
//! │     │           restart()         └─────────┘      └───────────┘      │
//! │     │                                  │                 │             │
//! │     └──────────── restart() ───────────┘    (2 s timer fires           │
//! │                                              retry_elapsed)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Duplicate Suppression
//! A camera held steady re-decodes the same barcode every frame. Any code
//! equal to the immediately previous one is ignored within a scanning
//! session. Returning to `Scanning` (retry or restart) clears the last
//! scanned code, so the *same* barcode can trigger a fresh lookup.
//!
//! This module is pure: the 2-second retry timer lives in the async
//! scanner session (tindera-db), which calls [`ScanResolver::retry_elapsed`]
//! when it fires.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use ts_rs::TS;

use crate::types::Product;

/// Delay before a failed scan automatically resumes scanning.
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Scans kept in the on-screen history, newest first.
pub const SCAN_HISTORY_LIMIT: usize = 10;

/// Message shown when the store could not be reached during a lookup.
pub const ERROR_FETCHING_MESSAGE: &str = "Error fetching product data. Retrying...";

// =============================================================================
// States and Outcomes
// =============================================================================

/// Current state of the scanner view.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", tag = "state")]
#[ts(export)]
pub enum ScanState {
    /// Accepting decoded strings from the scan source.
    Scanning,

    /// A product matched; scanning is halted until the user restarts.
    Matched { product: Product },

    /// Lookup came back empty or failed; an error message is showing and
    /// a timer will return the view to `Scanning`.
    Retrying { message: String },
}

/// What a single decoded string resulted in.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// Dropped without a lookup: duplicate, empty, or scanning is halted.
    Ignored,

    /// Exact barcode match; the matched product snapshot.
    Matched(Product),

    /// No product carries this barcode. The caller should schedule the
    /// retry timer.
    NotFound,
}

/// One entry in the scan history (hit or miss).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScanRecord {
    pub code: String,

    /// Title of the matched product, or `None` for a miss.
    pub product_title: Option<String>,

    #[ts(as = "String")]
    pub scanned_at: DateTime<Utc>,
}

// =============================================================================
// Resolver
// =============================================================================

/// Pure scan-resolution state machine.
///
/// Timestamps are passed in by the caller so the machine stays
/// deterministic and clock-free.
#[derive(Debug, Clone)]
pub struct ScanResolver {
    state: ScanState,
    last_scanned: Option<String>,
    scan_count: u64,
    history: Vec<ScanRecord>,
}

impl Default for ScanResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanResolver {
    /// Creates a resolver in the `Scanning` state.
    pub fn new() -> Self {
        ScanResolver {
            state: ScanState::Scanning,
            last_scanned: None,
            scan_count: 0,
            history: Vec::new(),
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Whether decoded strings are currently being accepted.
    #[inline]
    pub fn is_scanning(&self) -> bool {
        matches!(self.state, ScanState::Scanning)
    }

    /// The immediately previous decoded string, if any.
    #[inline]
    pub fn last_scanned(&self) -> Option<&str> {
        self.last_scanned.as_deref()
    }

    /// Number of lookups attempted this session.
    #[inline]
    pub fn scan_count(&self) -> u64 {
        self.scan_count
    }

    /// Scan history, newest first, capped at [`SCAN_HISTORY_LIMIT`].
    #[inline]
    pub fn history(&self) -> &[ScanRecord] {
        &self.history
    }

    /// Whether a decoded string would trigger a lookup right now.
    ///
    /// The async session consults this *before* fetching the product
    /// list, so duplicates never cost a store read.
    pub fn should_lookup(&self, code: &str) -> bool {
        !code.is_empty() && self.is_scanning() && self.last_scanned.as_deref() != Some(code)
    }

    /// Feeds one decoded string plus the current product list.
    ///
    /// Lookup is a linear scan for the first product whose `barcode`
    /// equals the code exactly (case-sensitive). Catalog barcodes are not
    /// guaranteed unique; first in list order wins.
    pub fn handle_scan(
        &mut self,
        code: &str,
        products: &[Product],
        at: DateTime<Utc>,
    ) -> ScanOutcome {
        if !self.should_lookup(code) {
            return ScanOutcome::Ignored;
        }

        self.last_scanned = Some(code.to_string());
        self.scan_count += 1;

        match products
            .iter()
            .find(|p| p.barcode.as_deref() == Some(code))
        {
            Some(product) => {
                self.push_history(code, Some(product.title.clone()), at);
                self.state = ScanState::Matched {
                    product: product.clone(),
                };
                ScanOutcome::Matched(product.clone())
            }
            None => {
                self.push_history(code, None, at);
                self.state = ScanState::Retrying {
                    message: format!("Product not found for barcode: {code}"),
                };
                ScanOutcome::NotFound
            }
        }
    }

    /// Records that the product list could not be fetched for `code`.
    ///
    /// User-visibly identical to a miss apart from the message; the same
    /// retry timer applies.
    pub fn lookup_failed(&mut self, code: &str, at: DateTime<Utc>) {
        if !self.should_lookup(code) {
            return;
        }

        self.last_scanned = Some(code.to_string());
        self.scan_count += 1;
        self.push_history(code, None, at);
        self.state = ScanState::Retrying {
            message: ERROR_FETCHING_MESSAGE.to_string(),
        };
    }

    /// The retry timer fired: clear the error and the last scanned code
    /// and resume scanning. The cleared code means the very same barcode
    /// is eligible again.
    ///
    /// No-op outside `Retrying` (a timer that was not cancelled in time
    /// must not disturb a later state).
    pub fn retry_elapsed(&mut self) {
        if matches!(self.state, ScanState::Retrying { .. }) {
            self.state = ScanState::Scanning;
            self.last_scanned = None;
        }
    }

    /// Manual restart from any state: back to `Scanning` with the match,
    /// message, and last scanned code cleared.
    pub fn restart(&mut self) {
        self.state = ScanState::Scanning;
        self.last_scanned = None;
    }

    /// Clears the scan history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn push_history(&mut self, code: &str, product_title: Option<String>, at: DateTime<Utc>) {
        self.history.insert(
            0,
            ScanRecord {
                code: code.to_string(),
                product_title,
                scanned_at: at,
            },
        );
        self.history.truncate(SCAN_HISTORY_LIMIT);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(title: &str, barcode: &str) -> Product {
        Product {
            id: format!("id-{barcode}"),
            title: title.to_string(),
            details: String::new(),
            price_cents: 10000,
            category: None,
            stock: 5,
            barcode: Some(barcode.to_string()),
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

    /// Feeding "123" twice in a row triggers exactly one lookup.
    #[test]
    fn test_duplicate_scan_suppressed() {
        let mut resolver = ScanResolver::new();
        let products = vec![product("Soap", "123")];

        let first = resolver.handle_scan("123", &products, now());
        assert!(matches!(first, ScanOutcome::Matched(_)));
        assert_eq!(resolver.scan_count(), 1);

        let second = resolver.handle_scan("123", &products, now());
        assert!(matches!(second, ScanOutcome::Ignored));
        assert_eq!(resolver.scan_count(), 1);
    }

    #[test]
    fn test_match_halts_scanning() {
        let mut resolver = ScanResolver::new();
        let products = vec![product("Soap", "111"), product("Towel", "222")];

        let outcome = resolver.handle_scan("111", &products, now());
        match outcome {
            ScanOutcome::Matched(p) => assert_eq!(p.title, "Soap"),
            other => panic!("expected match, got {other:?}"),
        }
        assert!(!resolver.is_scanning());

        // A different code while halted is ignored entirely
        let outcome = resolver.handle_scan("222", &products, now());
        assert!(matches!(outcome, ScanOutcome::Ignored));
        assert_eq!(resolver.scan_count(), 1);
    }

    /// Scan "999" with no matching product → Retrying; after the timer,
    /// back to Scanning with last-scanned cleared.
    #[test]
    fn test_not_found_then_retry_clears_last_scanned() {
        let mut resolver = ScanResolver::new();
        let products = vec![product("Soap", "111")];

        let outcome = resolver.handle_scan("999", &products, now());
        assert!(matches!(outcome, ScanOutcome::NotFound));
        match resolver.state() {
            ScanState::Retrying { message } => {
                assert_eq!(message, "Product not found for barcode: 999");
            }
            other => panic!("expected retrying, got {other:?}"),
        }

        resolver.retry_elapsed();
        assert!(resolver.is_scanning());
        assert_eq!(resolver.last_scanned(), None);

        // The same code is eligible again after the reset
        let outcome = resolver.handle_scan("999", &products, now());
        assert!(matches!(outcome, ScanOutcome::NotFound));
        assert_eq!(resolver.scan_count(), 2);
    }

    #[test]
    fn test_lookup_failed_uses_error_message() {
        let mut resolver = ScanResolver::new();
        resolver.lookup_failed("555", now());

        match resolver.state() {
            ScanState::Retrying { message } => assert_eq!(message, ERROR_FETCHING_MESSAGE),
            other => panic!("expected retrying, got {other:?}"),
        }
        assert_eq!(resolver.scan_count(), 1);
    }

    #[test]
    fn test_stale_retry_does_not_disturb_match() {
        let mut resolver = ScanResolver::new();
        let products = vec![product("Soap", "111")];
        resolver.handle_scan("111", &products, now());

        // A timer firing after a match must not resume scanning
        resolver.retry_elapsed();
        assert!(!resolver.is_scanning());
    }

    #[test]
    fn test_restart_clears_everything() {
        let mut resolver = ScanResolver::new();
        let products = vec![product("Soap", "111")];
        resolver.handle_scan("111", &products, now());
        assert!(!resolver.is_scanning());

        resolver.restart();
        assert!(resolver.is_scanning());
        assert_eq!(resolver.last_scanned(), None);

        // Fresh session accepts the same code again
        let outcome = resolver.handle_scan("111", &products, now());
        assert!(matches!(outcome, ScanOutcome::Matched(_)));
    }

    #[test]
    fn test_empty_code_ignored() {
        let mut resolver = ScanResolver::new();
        assert!(matches!(
            resolver.handle_scan("", &[], now()),
            ScanOutcome::Ignored
        ));
        assert_eq!(resolver.scan_count(), 0);
    }

    #[test]
    fn test_first_match_wins_for_duplicate_barcodes() {
        let mut resolver = ScanResolver::new();
        let products = vec![product("First", "777"), product("Second", "777")];

        match resolver.handle_scan("777", &products, now()) {
            ScanOutcome::Matched(p) => assert_eq!(p.title, "First"),
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_history_caps_and_orders_newest_first() {
        let mut resolver = ScanResolver::new();
        for i in 0..15 {
            let code = format!("code-{i}");
            resolver.handle_scan(&code, &[], now());
            resolver.retry_elapsed(); // resume so the next code is accepted
        }

        assert_eq!(resolver.history().len(), SCAN_HISTORY_LIMIT);
        assert_eq!(resolver.history()[0].code, "code-14");
        assert!(resolver.history()[0].product_title.is_none());
    }
}
