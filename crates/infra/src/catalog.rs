//! Product catalog: the application service in front of the Product Store.
//!
//! ```text
//! request
//!   ↓
//! 1. Validate input (same rules for create and update)
//!   ↓
//! 2. Delegate to the injected `ProductStore` (one unit of work)
//!   ↓
//! 3. Log the outcome
//! ```
//!
//! This module contains no IO itself; it composes the store trait.

use std::sync::Arc;

use stockpile_core::ProductId;
use stockpile_products::{NewProduct, Page, Product, ProductPatch};

use crate::store::{ProductStore, StoreError, StoreResult};

/// Product lifecycle operations over an injected store handle.
#[derive(Clone)]
pub struct ProductCatalog {
    store: Arc<dyn ProductStore>,
}

impl ProductCatalog {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, new: NewProduct) -> StoreResult<Product> {
        new.validate()?;

        let sku = new.sku.clone();
        match self.store.create(new).await {
            Ok(product) => {
                tracing::info!(product_id = %product.id_typed(), sku = %sku, "product created");
                Ok(product)
            }
            Err(e) => Err(log_failure("create", e)),
        }
    }

    pub async fn get(&self, id: ProductId) -> StoreResult<Product> {
        self.store.get(id).await.map_err(|e| log_failure("get", e))
    }

    pub async fn list(&self, page: Page) -> StoreResult<Vec<Product>> {
        self.store
            .list(page)
            .await
            .map_err(|e| log_failure("list", e))
    }

    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> StoreResult<Product> {
        patch.validate()?;

        let changed = !patch.is_empty();
        let product = self
            .store
            .update(id, patch)
            .await
            .map_err(|e| log_failure("update", e))?;

        if changed {
            tracing::info!(product_id = %id, "product updated");
        }
        Ok(product)
    }

    pub async fn delete(&self, id: ProductId) -> StoreResult<()> {
        self.store
            .delete(id)
            .await
            .map_err(|e| log_failure("delete", e))?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Connectivity probe. Failures are returned without logging.
    pub async fn ping(&self) -> StoreResult<()> {
        self.store.ping().await
    }
}

/// Domain rejections log at debug, backend failures at error.
fn log_failure(operation: &'static str, err: StoreError) -> StoreError {
    match &err {
        StoreError::Domain(e) => tracing::debug!(operation, error = %e, "product operation rejected"),
        StoreError::Backend { .. } => tracing::error!(operation, error = %err, "product store failure"),
    }
    err
}
