//! Domain error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// missing records, uniqueness conflicts). Storage failures belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The target product does not exist.
    #[error("Product with ID '{0}' not found.")]
    NotFound(ProductId),

    /// Another product already uses this SKU.
    #[error("Product with SKU '{sku}' already exists.")]
    Conflict { sku: String },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(sku: impl Into<String>) -> Self {
        Self::Conflict { sku: sku.into() }
    }

    pub fn not_found(id: ProductId) -> Self {
        Self::NotFound(id)
    }
}
