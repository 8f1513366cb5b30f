//! Infrastructure layer: product storage, database bootstrap, configuration.

pub mod catalog;
pub mod config;
pub mod db;
pub mod store;

pub use catalog::ProductCatalog;
pub use config::{ConfigError, DatabaseSettings, Settings};
pub use store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError, StoreResult};
