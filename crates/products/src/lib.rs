//! Products domain module.
//!
//! Business rules for tracked products (validation, partial updates, derived
//! stock status, pagination), implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod page;
pub mod product;

pub use page::{Page, MAX_PAGE_LIMIT};
pub use product::{
    NewProduct, Product, ProductPatch, StockStatus, DEFAULT_MIN_THRESHOLD, MAX_NAME_LEN,
    MAX_SKU_LEN,
};
