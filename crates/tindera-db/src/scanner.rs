//! # Scanner Session
//!
//! The async driver around the pure scan-resolution state machine: it owns
//! the store lookups and the retry timer the machine itself is not allowed
//! to have.
//!
//! ## Scan Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ScanSession::scan                                │
//! │                                                                         │
//! │  decoded string                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  should_lookup?  ──no──► return current state (no store read)           │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  fetch product list                                                     │
//! │   ├── ok   ──► handle_scan ──► Matched │ Retrying(not found)            │
//! │   └── err  ──► lookup_failed ──► Retrying(fetch error)                  │
//! │                                      │                                  │
//! │                      Retrying ───────┘                                  │
//! │                         │  spawn 2 s timer (cancels any previous)       │
//! │                         ▼                                               │
//! │                  retry_elapsed ──► Scanning                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The timer is a plain task handle: `restart()` (and drop) aborts it, and
//! the resolver additionally ignores a stale firing, so a timer can never
//! push a later state back to `Scanning`.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use rand::Rng;
use tindera_core::scan::{ScanRecord, RETRY_DELAY};
use tindera_core::{ScanOutcome, ScanResolver, ScanState};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::store::Store;

/// One scanner-page session: resolver state plus the pending retry timer.
#[derive(Debug)]
pub struct ScanSession {
    store: Store,
    resolver: Arc<Mutex<ScanResolver>>,
    retry_timer: Option<JoinHandle<()>>,
}

impl ScanSession {
    /// Creates a session in the `Scanning` state.
    pub fn new(store: Store) -> Self {
        ScanSession {
            store,
            resolver: Arc::new(Mutex::new(ScanResolver::new())),
            retry_timer: None,
        }
    }

    /// Feeds one decoded string and returns the state it left behind.
    ///
    /// Duplicates and halted states return early without touching the
    /// store; a miss or a fetch failure schedules the auto-retry timer.
    pub async fn scan(&mut self, code: &str) -> ScanState {
        let code = code.trim();

        {
            let resolver = self.resolver.lock().expect("scan state lock poisoned");
            if !resolver.should_lookup(code) {
                return resolver.state().clone();
            }
        }

        let outcome = match self.store.products().list().await {
            Ok(products) => {
                let mut resolver = self.resolver.lock().expect("scan state lock poisoned");
                resolver.handle_scan(code, &products, Utc::now())
            }
            Err(err) => {
                warn!(code, error = %err, "Product fetch failed during scan");
                let mut resolver = self.resolver.lock().expect("scan state lock poisoned");
                resolver.lookup_failed(code, Utc::now());
                ScanOutcome::NotFound
            }
        };

        match outcome {
            ScanOutcome::Matched(product) => {
                debug!(code, product = %product.title, "Scan matched");
            }
            ScanOutcome::NotFound => {
                debug!(code, "Scan unresolved; scheduling retry");
                self.schedule_retry();
            }
            ScanOutcome::Ignored => {}
        }

        self.state()
    }

    /// Current resolver state.
    pub fn state(&self) -> ScanState {
        self.resolver
            .lock()
            .expect("scan state lock poisoned")
            .state()
            .clone()
    }

    /// Scan history, newest first.
    pub fn history(&self) -> Vec<ScanRecord> {
        self.resolver
            .lock()
            .expect("scan state lock poisoned")
            .history()
            .to_vec()
    }

    /// Number of lookups attempted this session.
    pub fn scan_count(&self) -> u64 {
        self.resolver
            .lock()
            .expect("scan state lock poisoned")
            .scan_count()
    }

    /// Manual restart: cancels any pending retry and resumes scanning.
    pub fn restart(&mut self) {
        self.cancel_retry();
        self.resolver
            .lock()
            .expect("scan state lock poisoned")
            .restart();
    }

    fn schedule_retry(&mut self) {
        self.cancel_retry();
        let resolver = Arc::clone(&self.resolver);
        self.retry_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(RETRY_DELAY).await;
            resolver
                .lock()
                .expect("scan state lock poisoned")
                .retry_elapsed();
        }));
    }

    fn cancel_retry(&mut self) {
        if let Some(timer) = self.retry_timer.take() {
            timer.abort();
        }
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.cancel_retry();
    }
}

// =============================================================================
// Barcode Helpers
// =============================================================================

/// Generates a random 12-digit barcode for a catalog product.
pub fn generate_barcode() -> String {
    let mut rng = rand::thread_rng();
    rng.gen_range(100_000_000_000u64..1_000_000_000_000u64)
        .to_string()
}

/// URL of a rendered Code 128 image for a barcode, for printing labels.
pub fn barcode_image_url(code: &str) -> String {
    format!("https://barcode.tec-it.com/barcode.ashx?data={code}&code=Code128")
}

// =============================================================================
// Unit Tests
// =============================================================================
