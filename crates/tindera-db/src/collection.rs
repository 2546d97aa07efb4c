//! # Keyed Document Collections
//!
//! The generic storage primitive: every record lives in a named collection
//! as a JSON document under a generated key.
//!
//! ## Document Life Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Collection<T> Operations                           │
//! │                                                                         │
//! │  push(record)  ──► key = uuid-v4, INSERT body ──► Created event         │
//! │  get(id)       ──► SELECT body, deserialize, stamp id                   │
//! │  list()        ──► SELECT all in push order                             │
//! │  merge(id, {}) ──► read-modify-write top-level keys ──► Updated event   │
//! │  remove(id)    ──► DELETE ──► Removed event                             │
//! │  subscribe()   ──► ChangeSubscription (detaches on drop)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Notes
//! - The `id` column is the authoritative key. Bodies never store it; it is
//!   stamped onto records at read time via [`Document::set_document_id`].
//! - `merge` replaces top-level keys only (no deep merge); a `null` value
//!   in the patch deletes the key. Concurrent merges are last-write-wins
//!   per key, which is the contract single-writer UI flows rely on.
//! - Change events carry the collection, key, and kind - not the body.
//!   Subscribers re-read, which keeps notification delivery decoupled from
//!   how large documents get.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Capacity of the change broadcast channel. A subscriber that lags past
/// this many undelivered events skips ahead (it re-reads anyway).
const CHANGE_CHANNEL_CAPACITY: usize = 64;

// =============================================================================
// Documents
// =============================================================================

/// A record type stored in a named collection.
///
/// Implemented for the three store record types; the constant names the
/// collection and `set_document_id` lets reads stamp the key column onto
/// the deserialized record.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    /// Collection name this type is stored under.
    const COLLECTION: &'static str;

    /// Stamps the authoritative key onto the record.
    fn set_document_id(&mut self, id: &str);
}

impl Document for tindera_core::Product {
    const COLLECTION: &'static str = "products";

    fn set_document_id(&mut self, id: &str) {
        self.id = id.to_string();
    }
}

impl Document for tindera_core::Transaction {
    const COLLECTION: &'static str = "transactions";

    fn set_document_id(&mut self, id: &str) {
        self.id = id.to_string();
    }
}

impl Document for tindera_core::Expense {
    const COLLECTION: &'static str = "expenses";

    fn set_document_id(&mut self, id: &str) {
        self.id = id.to_string();
    }
}

// =============================================================================
// Change Events
// =============================================================================

/// What happened to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Removed,
}

/// One change notification. Carries the key, not the body.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// Collection the document lives in.
    pub collection: &'static str,

    /// Document key.
    pub id: String,

    pub kind: ChangeKind,
}

/// A live subscription to change events.
///
/// Dropping the handle detaches it; there is no unsubscribe call. An
/// optional collection filter restricts delivery to one collection.
#[derive(Debug)]
pub struct ChangeSubscription {
    rx: broadcast::Receiver<ChangeEvent>,
    filter: Option<&'static str>,
}

impl ChangeSubscription {
    pub(crate) fn new(rx: broadcast::Receiver<ChangeEvent>, filter: Option<&'static str>) -> Self {
        ChangeSubscription { rx, filter }
    }

    /// Waits for the next matching change event.
    ///
    /// Returns `None` once the store has been dropped. A lagged receiver
    /// skips the missed events and keeps going - subscribers re-read the
    /// collection rather than replaying individual changes.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => {
                    if self.filter.is_none() || self.filter == Some(event.collection) {
                        return Some(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    debug!(missed, "Change subscription lagged; skipping ahead");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Creates the change channel shared by all collections of a store.
pub(crate) fn change_channel() -> broadcast::Sender<ChangeEvent> {
    broadcast::channel(CHANGE_CHANNEL_CAPACITY).0
}

// =============================================================================
// Collection
// =============================================================================

/// A typed view over one named collection in the documents table.
///
/// Cheap to construct and clone; carries a pool handle and the store's
/// change sender.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    pool: SqlitePool,
    events: broadcast::Sender<ChangeEvent>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Collection<T> {
    pub(crate) fn new(pool: SqlitePool, events: broadcast::Sender<ChangeEvent>) -> Self {
        Collection {
            pool,
            events,
            _marker: PhantomData,
        }
    }

    /// Inserts a record under a freshly generated key and returns the key.
    ///
    /// Any `id` already on the record is ignored; the generated key is
    /// authoritative.
    pub async fn push(&self, record: &T) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        let body = body_without_id(serde_json::to_value(record)?);

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)")
            .bind(T::COLLECTION)
            .bind(&id)
            .bind(body.to_string())
            .execute(&self.pool)
            .await?;

        debug!(collection = T::COLLECTION, id = %id, "Document pushed");
        self.notify(ChangeKind::Created, &id);
        Ok(id)
    }

    /// Reads one document by key.
    pub async fn get(&self, id: &str) -> StoreResult<Option<T>> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = ?1 AND id = ?2")
            .bind(T::COLLECTION)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let body: String = row.get(0);
                let mut record: T = serde_json::from_str(&body)?;
                record.set_document_id(id);
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Reads the whole collection in push order.
    ///
    /// A document whose body no longer parses is logged and skipped; one
    /// corrupt record must not take the whole collection down with it.
    pub async fn list(&self) -> StoreResult<Vec<T>> {
        let rows =
            sqlx::query("SELECT id, body FROM documents WHERE collection = ?1 ORDER BY rowid")
                .bind(T::COLLECTION)
                .fetch_all(&self.pool)
                .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get(0);
            let body: String = row.get(1);
            match serde_json::from_str::<T>(&body) {
                Ok(mut record) => {
                    record.set_document_id(&id);
                    records.push(record);
                }
                Err(err) => {
                    warn!(
                        collection = T::COLLECTION,
                        id = %id,
                        error = %err,
                        "Skipping unreadable document"
                    );
                }
            }
        }
        Ok(records)
    }

    /// Merges a JSON object into a document's top-level keys.
    ///
    /// Keys present in the patch replace the stored keys; a `null` value
    /// deletes the key. Keys absent from the patch are untouched.
    pub async fn merge(&self, id: &str, patch: Value) -> StoreResult<()> {
        let Value::Object(patch) = patch else {
            return Err(StoreError::InvalidPatch);
        };

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT body FROM documents WHERE collection = ?1 AND id = ?2")
            .bind(T::COLLECTION)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Err(StoreError::not_found(T::COLLECTION, id));
        };

        let body: String = row.get(0);
        let mut doc: Value = serde_json::from_str(&body)?;
        if let Value::Object(map) = &mut doc {
            for (key, value) in patch {
                if value.is_null() {
                    map.remove(&key);
                } else {
                    map.insert(key, value);
                }
            }
        }

        sqlx::query("UPDATE documents SET body = ?3 WHERE collection = ?1 AND id = ?2")
            .bind(T::COLLECTION)
            .bind(id)
            .bind(doc.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(collection = T::COLLECTION, id = %id, "Document merged");
        self.notify(ChangeKind::Updated, id);
        Ok(())
    }

    /// Deletes a document. Deleting a missing key is a no-op.
    pub async fn remove(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ?1 AND id = ?2")
            .bind(T::COLLECTION)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            debug!(collection = T::COLLECTION, id = %id, "Document removed");
            self.notify(ChangeKind::Removed, id);
        }
        Ok(())
    }

    /// Number of documents in the collection.
    pub async fn count(&self) -> StoreResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) FROM documents WHERE collection = ?1")
            .bind(T::COLLECTION)
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.get(0);
        Ok(count as u64)
    }

    /// Subscribes to changes in this collection only.
    pub fn subscribe(&self) -> ChangeSubscription {
        ChangeSubscription::new(self.events.subscribe(), Some(T::COLLECTION))
    }

    fn notify(&self, kind: ChangeKind, id: &str) {
        // send() errs when nobody is subscribed, which is fine
        let _ = self.events.send(ChangeEvent {
            collection: T::COLLECTION,
            id: id.to_string(),
            kind,
        });
    }
}

/// Strips the `id` key from a serialized body; the key column owns it.
fn body_without_id(mut body: Value) -> Value {
    if let Value::Object(map) = &mut body {
        map.remove("id");
    }
    body
}

// =============================================================================
// Unit Tests
// =============================================================================
