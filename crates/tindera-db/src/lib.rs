//! # tindera-db: Document Store Layer for Tindera POS
//!
//! This crate owns everything tindera-core is forbidden from touching:
//! SQLite, change notifications, clocks, and timers.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tindera POS Data Flow                            │
//! │                                                                         │
//! │  Frontend action (add product, checkout, scan)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tindera-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌───────────────┐   ┌──────────────────┐  │   │
//! │  │   │    Store     │   │ Repositories  │   │    Services      │  │   │
//! │  │   │ (store.rs)   │   │ product.rs    │   │ Dashboard        │  │   │
//! │  │   │              │   │ transaction.rs│   │ ScanSession      │  │   │
//! │  │   │ SqlitePool   │◄──│ expense.rs    │◄──│ (timers live     │  │   │
//! │  │   │ ChangeEvents │   │               │   │  here, not in    │  │   │
//! │  │   └──────────────┘   └───────────────┘   │  tindera-core)   │  │   │
//! │  │          ▲                               └──────────────────┘  │   │
//! │  │          │                                                     │   │
//! │  │   ┌──────┴───────┐                                             │   │
//! │  │   │ Collection<T>│  generic keyed JSON documents               │   │
//! │  │   └──────────────┘                                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite documents table (WAL)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Pool creation, configuration, the [`Store`] client
//! - [`collection`] - Generic keyed document collections and subscriptions
//! - [`repository`] - Typed, validated repositories per collection
//! - [`dashboard`] - Snapshot-then-aggregate dashboard service
//! - [`scanner`] - Scan session with the auto-retry timer
//! - [`migrations`] - Embedded schema migrations
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tindera_db::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("./tindera.db")).await?;
//!
//! let product = store.products().add(form).await?;
//! let invoices = store.transactions().list().await?;
//!
//! let mut changes = store.subscribe();
//! while let Some(event) = changes.next().await {
//!     println!("{} {:?}", event.collection, event.kind);
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collection;
pub mod dashboard;
pub mod error;
pub mod migrations;
pub mod repository;
pub mod scanner;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use collection::{ChangeEvent, ChangeKind, ChangeSubscription, Collection, Document};
pub use dashboard::{Dashboard, DashboardSnapshot, RangePreset};
pub use error::{StoreError, StoreResult};
pub use scanner::ScanSession;
pub use store::{Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::expense::ExpenseRepository;
pub use repository::product::{ProductForm, ProductRepository};
pub use repository::transaction::TransactionRepository;
