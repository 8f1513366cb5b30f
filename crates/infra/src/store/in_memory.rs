use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use stockpile_core::{DomainError, Entity, ProductId};
use stockpile_products::{NewProduct, Page, Product, ProductPatch};

use super::{ProductStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct State {
    products: BTreeMap<ProductId, Product>,
    /// Last id handed out; ids are never reused, even after deletes.
    last_id: i64,
}

impl State {
    fn sku_taken(&self, sku: &str, except: Option<ProductId>) -> bool {
        self.products
            .values()
            .any(|p| p.sku() == sku && Some(p.id()) != except)
    }
}

/// In-memory product store.
///
/// Intended for tests/dev. All writers serialize on a single lock, so the SKU
/// check and the write it guards are atomic.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    state: RwLock<State>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products.
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.products.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(operation: &'static str) -> StoreError {
    StoreError::backend(operation, "lock poisoned")
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, new: NewProduct) -> StoreResult<Product> {
        let mut state = self.state.write().map_err(|_| poisoned("create"))?;

        if state.sku_taken(&new.sku, None) {
            return Err(DomainError::conflict(new.sku).into());
        }

        state.last_id += 1;
        let id = ProductId::from_i64(state.last_id);
        let product = Product::new(id, new, Utc::now());
        state.products.insert(id, product.clone());

        Ok(product)
    }

    async fn get(&self, id: ProductId) -> StoreResult<Product> {
        let state = self.state.read().map_err(|_| poisoned("get"))?;
        state
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(id).into())
    }

    async fn list(&self, page: Page) -> StoreResult<Vec<Product>> {
        let state = self.state.read().map_err(|_| poisoned("list"))?;
        Ok(page.slice(state.products.values()).cloned().collect())
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> StoreResult<Product> {
        let mut state = self.state.write().map_err(|_| poisoned("update"))?;

        let mut product = state
            .products
            .get(&id)
            .cloned()
            .ok_or(DomainError::not_found(id))?;

        if let Some(sku) = patch.sku.as_deref() {
            if state.sku_taken(sku, Some(id)) {
                return Err(DomainError::conflict(sku).into());
            }
        }

        // Merge on a copy; the stored record only changes once the merge is done.
        if product.apply_patch(patch, Utc::now()) {
            state.products.insert(id, product.clone());
        }

        Ok(product)
    }

    async fn delete(&self, id: ProductId) -> StoreResult<()> {
        let mut state = self.state.write().map_err(|_| poisoned("delete"))?;
        state
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(id).into())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.state.read().map(|_| ()).map_err(|_| poisoned("ping"))
    }
}
