//! Product Store: durable storage and the product lifecycle operations.
//!
//! Backends:
//! - [`InMemoryProductStore`] for tests/dev.
//! - [`PostgresProductStore`] backed by a sqlx pool.
//!
//! Both enforce SKU uniqueness on create *and* update, and both list in
//! ascending id order so pagination is stable across calls.

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use stockpile_core::{DomainError, ProductId};
use stockpile_products::{NewProduct, Page, Product, ProductPatch};

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation error.
///
/// Domain failures (`NotFound`, `Conflict`, validation) are surfaced as-is;
/// everything else is a backend failure and is fatal for the request.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }

    /// The wrapped domain error, if this is not a backend failure.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            StoreError::Domain(e) => Some(e),
            StoreError::Backend { .. } => None,
        }
    }
}

/// Durable product storage.
///
/// Every method is one short unit of work: it either commits fully or leaves
/// no visible change.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a new product, assigning its id and `created_at`.
    ///
    /// Fails with [`DomainError::Conflict`] if the SKU is taken.
    async fn create(&self, new: NewProduct) -> StoreResult<Product>;

    async fn get(&self, id: ProductId) -> StoreResult<Product>;

    /// Products in ascending id order, windowed by `page`.
    async fn list(&self, page: Page) -> StoreResult<Vec<Product>>;

    /// Apply a partial update. An empty patch returns the record unchanged.
    ///
    /// Fails with [`DomainError::Conflict`] if the patch moves the product onto
    /// another product's SKU.
    async fn update(&self, id: ProductId, patch: ProductPatch) -> StoreResult<Product>;

    async fn delete(&self, id: ProductId) -> StoreResult<()>;

    /// Connectivity probe for health reporting.
    async fn ping(&self) -> StoreResult<()>;
}
