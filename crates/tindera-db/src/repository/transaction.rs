//! Finished-invoice repository.
//!
//! Transactions are append-only. A checkout draft is validated, totaled,
//! and pushed; after that the record never changes. There is deliberately
//! no update or delete here - the ledger's integrity comes from the
//! missing methods, not from runtime checks.

use chrono::{DateTime, Utc};
use tindera_core::{InvoiceDraft, Transaction};
use tracing::debug;

use crate::collection::{ChangeSubscription, Collection};
use crate::error::StoreResult;

/// Repository for finished invoices.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    coll: Collection<Transaction>,
}

impl TransactionRepository {
    pub(crate) fn new(coll: Collection<Transaction>) -> Self {
        TransactionRepository { coll }
    }

    /// Finalizes a checkout draft and appends it, stamped with the current
    /// time.
    pub async fn record(&self, draft: InvoiceDraft) -> StoreResult<Transaction> {
        self.record_at(draft, Utc::now()).await
    }

    /// Finalizes a checkout draft with an explicit finish time.
    ///
    /// Used for backfilling imported ledgers (and by tests that need
    /// deterministic timestamps); normal checkout goes through [`record`].
    ///
    /// [`record`]: TransactionRepository::record
    pub async fn record_at(
        &self,
        draft: InvoiceDraft,
        finished_at: DateTime<Utc>,
    ) -> StoreResult<Transaction> {
        let mut tx = draft.finalize(finished_at)?;
        let id = self.coll.push(&tx).await?;
        tx.id = id;
        debug!(
            id = %tx.id,
            customer = %tx.customer_name,
            total_cents = tx.total_cents,
            "Invoice recorded"
        );
        Ok(tx)
    }

    /// Lists all invoices in append order.
    pub async fn list(&self) -> StoreResult<Vec<Transaction>> {
        self.coll.list().await
    }

    /// Reads one invoice by key.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Transaction>> {
        self.coll.get(id).await
    }

    /// Subscribes to invoice changes.
    pub fn subscribe(&self) -> ChangeSubscription {
        self.coll.subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::repository::ProductForm;
    use crate::store::{Store, StoreConfig};

    async fn store() -> Store {
        Store::open(StoreConfig::in_memory())
            .await
            .expect("in-memory store")
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

    #[tokio::test]
    async fn test_record_persists_complete_totals() {
        let store = store().await;
        let consultation = store.products().add(form("Consultation", 12000)).await.unwrap();
        let urinalysis = store.products().add(form("Urinalysis", 8000)).await.unwrap();

        let mut draft = InvoiceDraft::new("Maria Santos");
        draft.add_product(&consultation);
        draft.add_product(&urinalysis);
        draft.set_discount_percent(10.0);

        let tx = store.transactions().record(draft).await.unwrap();
        assert!(!tx.id.is_empty());
        assert_eq!(tx.subtotal_cents, Some(20000));
        assert_eq!(tx.discount_amount_cents, Some(2000));
        assert_eq!(tx.total_cents, Some(18000));

        let read = store
            .transactions()
            .get(&tx.id)
            .await
            .unwrap()
            .expect("stored");
        assert_eq!(read.total_cents, Some(18000));
        assert_eq!(read.products.len(), 2);
        assert_eq!(read.products[0].display_name(), "Consultation");
    }

    #[tokio::test]
    async fn test_invalid_draft_writes_nothing() {
        let store = store().await;
        let draft = InvoiceDraft::new("Maria Santos"); // no line items

        let err = store.transactions().record(draft).await;
        assert!(matches!(err, Err(StoreError::Validation(_))));
        assert!(store.transactions().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_at_uses_given_timestamp() {
        let store = store().await;
        let product = store.products().add(form("Consultation", 12000)).await.unwrap();

        let finished_at = DateTime::parse_from_rfc3339("2026-02-14T09:30:00Z")
            .expect("test timestamp")
            .with_timezone(&Utc);
        let mut draft = InvoiceDraft::new("Jose Rizal");
        draft.add_product(&product);

        let tx = store
            .transactions()
            .record_at(draft, finished_at)
            .await
            .unwrap();
        assert_eq!(tx.finished_at, Some(finished_at));

        let read = store
            .transactions()
            .get(&tx.id)
            .await
            .unwrap()
            .expect("stored");
        assert_eq!(read.finished_at, Some(finished_at));
    }
}
