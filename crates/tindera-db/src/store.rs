//! # Store Handle and Configuration
//!
//! Connection pool creation and the [`Store`] client handed to every
//! component that touches data.
//!
//! ## Explicit Client
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Store Construction                                │
//! │                                                                         │
//! │  StoreConfig::new("./tindera.db")     StoreConfig::in_memory()         │
//! │       │                                    │ (tests)                   │
//! │       └──────────────┬─────────────────────┘                           │
//! │                      ▼                                                  │
//! │              Store::open(config)                                        │
//! │              ├── WAL journal, NORMAL sync, busy timeout                 │
//! │              ├── connection pool                                        │
//! │              └── run embedded migrations                                │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  store.products() / store.transactions() / store.expenses()            │
//! │  store.collection::<T>() for generic access                            │
//! │  store.subscribe() for store-wide change events                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing reaches the database through an ambient global: every service
//! receives a `Store` (cheaply cloneable) at construction. Tests hand in an
//! in-memory store and exercise the real query paths.

use std::path::PathBuf;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tracing::info;

use crate::collection::{self, ChangeEvent, ChangeSubscription, Collection, Document};
use crate::error::StoreResult;
use crate::migrations;
use crate::repository::{ExpenseRepository, ProductRepository, TransactionRepository};

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration with sensible defaults.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum pool connections.
    pub max_connections: u32,

    /// Connections kept open when idle.
    pub min_connections: u32,

    /// Timeout acquiring a connection from the pool.
    pub connect_timeout: Duration,

    /// Idle time before a surplus connection is closed.
    pub idle_timeout: Duration,

    /// Whether to run migrations on open.
    pub run_migrations: bool,
}

impl StoreConfig {
    /// Creates a configuration for a database file path.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: database_path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of pool connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets whether to run migrations on open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory store configuration (for testing).
    ///
    /// An in-memory SQLite database lives and dies with its connection, so
    /// the pool is pinned to a single connection.
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Handle to the document store: pool plus the change broadcast channel.
///
/// Cloning is cheap (pool handle + channel sender); every component holds
/// its own clone rather than reaching for a global.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
    events: broadcast::Sender<ChangeEvent>,
}

impl Store {
    /// Opens the store: creates the database file if missing, configures
    /// SQLite for concurrent reads, and runs pending migrations.
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening document store"
        );

        let connect_options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            .create_if_missing(true)
            // WAL: readers never block the writer
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL: durability/speed balance appropriate for a local store
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .connect_with(connect_options)
            .await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        info!("Document store ready");
        Ok(Store {
            pool,
            events: collection::change_channel(),
        })
    }

    /// Generic access to a collection by record type.
    pub fn collection<T: Document>(&self) -> Collection<T> {
        Collection::new(self.pool.clone(), self.events.clone())
    }

    /// The product catalog repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.collection())
    }

    /// The finished-invoice repository.
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.collection())
    }

    /// The expense repository.
    pub fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new(self.collection())
    }

    /// Subscribes to change events across all collections.
    pub fn subscribe(&self) -> ChangeSubscription {
        ChangeSubscription::new(self.events.subscribe(), None)
    }

    /// Raw pool access, for maintenance queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory_runs_migrations() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();

        // The documents table exists and is queryable
        let count = store
            .collection::<tindera_core::Product>()
            .count()
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_clones_share_the_change_channel() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let clone = store.clone();

        let mut sub = store.subscribe();
        clone
            .collection::<tindera_core::Expense>()
            .push(&tindera_core::Expense {
                id: String::new(),
                amount_cents: 500,
                note: "Taxi".to_string(),
                date: None,
            })
            .await
            .unwrap();

        let event = sub.next().await.expect("event from clone");
        assert_eq!(event.collection, "expenses");
    }

    #[test]
    fn test_config_defaults() {
        let config = StoreConfig::new("./tindera.db");
        assert_eq!(config.max_connections, 5);
        assert!(config.run_migrations);

        let mem = StoreConfig::in_memory();
        assert_eq!(mem.max_connections, 1);
    }
}
