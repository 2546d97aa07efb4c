//! Product catalog repository.
//!
//! Products are the clinic's service catalog: consultations, lab work,
//! procedures. Create/update go through form validation; availability has
//! its own narrow toggle so the catalog list can flip it inline.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tindera_core::{validation, Product};
use tracing::debug;
use ts_rs::TS;

use crate::collection::{ChangeSubscription, Collection};
use crate::error::StoreResult;

/// Form payload for creating or updating a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductForm {
    pub title: String,

    #[serde(default)]
    pub details: String,

    /// Price in centavos.
    pub price_cents: i64,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub stock: i64,

    #[serde(default)]
    pub barcode: Option<String>,
}

/// Repository for the product catalog.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    coll: Collection<Product>,
}

impl ProductRepository {
    pub(crate) fn new(coll: Collection<Product>) -> Self {
        ProductRepository { coll }
    }

    /// Lists the full catalog in creation order.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        self.coll.list().await
    }

    /// Reads one product by key.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        self.coll.get(id).await
    }

    /// Validates and creates a product. New products start available.
    pub async fn add(&self, form: ProductForm) -> StoreResult<Product> {
        validation::validate_title(&form.title)?;
        validation::validate_price(form.price_cents)?;
        validation::validate_stock(form.stock)?;

        let now = Utc::now();
        let mut product = Product {
            id: String::new(),
            title: form.title.trim().to_string(),
            details: form.details,
            price_cents: form.price_cents,
            category: form.category,
            stock: form.stock,
            barcode: form.barcode,
            available: true,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let id = self.coll.push(&product).await?;
        product.id = id;
        debug!(id = %product.id, title = %product.title, "Product created");
        Ok(product)
    }

    /// Validates and overwrites a product's form fields.
    ///
    /// Merges at the top level, so `createdAt` survives; editing a product
    /// also re-marks it available, matching the catalog's edit dialog.
    pub async fn update(&self, id: &str, form: ProductForm) -> StoreResult<()> {
        validation::validate_title(&form.title)?;
        validation::validate_price(form.price_cents)?;
        validation::validate_stock(form.stock)?;

        self.coll
            .merge(
                id,
                json!({
                    "title": form.title.trim(),
                    "details": form.details,
                    "priceCents": form.price_cents,
                    "category": form.category,
                    "stock": form.stock,
                    "barcode": form.barcode,
                    "available": true,
                    "updatedAt": Utc::now(),
                }),
            )
            .await?;
        debug!(id, "Product updated");
        Ok(())
    }

    /// Flips availability without touching any other field.
    pub async fn set_available(&self, id: &str, available: bool) -> StoreResult<()> {
        self.coll.merge(id, json!({ "available": available })).await
    }

    /// Deletes a product from the catalog.
    ///
    /// Past invoices keep their frozen line-item snapshots; nothing
    /// references the deleted key.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.coll.remove(id).await
    }

    /// First product whose barcode equals `code` exactly.
    pub async fn find_by_barcode(&self, code: &str) -> StoreResult<Option<Product>> {
        let products = self.coll.list().await?;
        Ok(products
            .into_iter()
            .find(|p| p.barcode.as_deref() == Some(code)))
    }

    /// Subscribes to product changes.
    pub fn subscribe(&self) -> ChangeSubscription {
        self.coll.subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
