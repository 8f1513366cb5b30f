//! Postgres-backed product store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation on `sku`) | `23505` | `Domain(Conflict)` |
//! | Database (check constraint violation) | `23514` | `Domain(Validation)` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed, Io, Tls, ... | N/A | `Backend` |
//!
//! ## Transactions
//!
//! Every operation runs in its own transaction (or a single autocommitted
//! statement). `update` locks the target row with `SELECT ... FOR UPDATE`,
//! merges the patch in Rust with [`Product::apply_patch`], then writes the
//! merged row back, so the partial-update semantics are identical to the
//! in-memory store.
//!
//! Concurrent creates with the same SKU are arbitrated by the unique index:
//! exactly one insert commits, the others observe `Conflict`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use stockpile_core::{DomainError, ProductId};
use stockpile_products::{NewProduct, Page, Product, ProductPatch};

use super::{ProductStore, StoreError, StoreResult};

const PRODUCT_COLUMNS: &str =
    "id, name, sku, description, quantity, min_threshold, created_at, updated_at";

/// Postgres-backed product store.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    sku: String,
    description: Option<String>,
    quantity: i32,
    min_threshold: i32,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product::restore(
            ProductId::from_i64(row.id),
            NewProduct {
                name: row.name,
                sku: row.sku,
                description: row.description,
                quantity: row.quantity,
                min_threshold: row.min_threshold,
            },
            row.created_at,
            row.updated_at,
        )
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self, new), fields(sku = %new.sku), err)]
    async fn create(&self, new: NewProduct) -> StoreResult<Product> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("create", e, None))?;

        let row: ProductRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO products (name, sku, description, quantity, min_threshold)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.sku)
        .bind(&new.description)
        .bind(new.quantity)
        .bind(new.min_threshold)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create", e, Some(&new.sku)))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("create", e, Some(&new.sku)))?;

        Ok(row.into())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn get(&self, id: ProductId) -> StoreResult<Product> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e, None))?;

        row.map(Product::from)
            .ok_or_else(|| DomainError::not_found(id).into())
    }

    #[instrument(skip(self), fields(offset = page.skip(), limit = page.limit()), err)]
    async fn list(&self, page: Page) -> StoreResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC OFFSET $1 LIMIT $2"
        ))
        .bind(i64::from(page.skip()))
        .bind(i64::from(page.limit()))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e, None))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self, patch), fields(product_id = %id), err)]
    async fn update(&self, id: ProductId, patch: ProductPatch) -> StoreResult<Product> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("update", e, None))?;

        let current: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_i64())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update", e, None))?;

        let mut product: Product = current.ok_or(DomainError::not_found(id))?.into();

        if !product.apply_patch(patch, Utc::now()) {
            return Ok(product);
        }

        let row: ProductRow = sqlx::query_as(&format!(
            r#"
            UPDATE products
            SET name = $2,
                sku = $3,
                description = $4,
                quantity = $5,
                min_threshold = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id.as_i64())
        .bind(product.name())
        .bind(product.sku())
        .bind(product.description())
        .bind(product.quantity())
        .bind(product.min_threshold())
        .bind(product.updated_at())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update", e, Some(product.sku())))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("update", e, Some(product.sku())))?;

        Ok(row.into())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete(&self, id: ProductId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i64())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e, None))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(id).into());
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map(|_| ())
            .map_err(|e| map_sqlx_error("ping", e, None))
    }
}

/// Map a SQLx error to a `StoreError`.
///
/// `sku` is the SKU being written, if any; a unique violation is only reported
/// as a SKU conflict when there is one.
fn map_sqlx_error(operation: &'static str, err: sqlx::Error, sku: Option<&str>) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned());
            match (code.as_deref(), sku) {
                // Unique violation: the only unique column besides the identity is `sku`.
                (Some("23505"), Some(sku)) => DomainError::conflict(sku).into(),
                (Some("23514"), _) => {
                    DomainError::validation(format!("check constraint violated: {}", db_err.message()))
                        .into()
                }
                _ => StoreError::backend(
                    operation,
                    format!("database error: {}", db_err.message()),
                ),
            }
        }
        sqlx::Error::PoolClosed => StoreError::backend(operation, "connection pool closed"),
        other => StoreError::backend(operation, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    //! These tests need a live Postgres (`DATABASE_URL`) with the migrations
    //! applied; run with `cargo test -p stockpile-infra -- --ignored`.

    use super::*;
    use stockpile_core::Entity;

    async fn store() -> PostgresProductStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
        let pool = PgPool::connect(&url).await.expect("failed to connect");
        crate::db::run_migrations(&pool).await.expect("failed to migrate");
        PostgresProductStore::new(pool)
    }

    fn unique_sku(prefix: &str) -> String {
        format!("{prefix}-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default())
    }

    #[tokio::test]
    #[ignore]
    async fn create_get_update_delete_lifecycle() {
        let store = store().await;
        let sku = unique_sku("PG");

        let created = store
            .create(NewProduct::new("Widget", sku.clone()).with_quantity(10))
            .await
            .unwrap();
        assert_eq!(created.updated_at(), None);
        assert_eq!(store.get(created.id()).await.unwrap(), created);

        let updated = store
            .update(
                created.id(),
                ProductPatch {
                    quantity: Some(5),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.quantity(), 5);
        assert_eq!(updated.name(), "Widget");
        assert!(updated.updated_at().is_some());

        store.delete(created.id()).await.unwrap();
        assert!(matches!(
            store.get(created.id()).await,
            Err(StoreError::Domain(DomainError::NotFound(_)))
        ));
    }

    #[tokio::test]
    #[ignore]
    async fn duplicate_sku_maps_to_conflict() {
        let store = store().await;
        let sku = unique_sku("DUP");

        let first = store.create(NewProduct::new("A", sku.clone())).await.unwrap();
        let err = store.create(NewProduct::new("B", sku.clone())).await.unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Conflict { .. })));

        let other = store.create(NewProduct::new("C", unique_sku("OTHER"))).await.unwrap();
        let err = store
            .update(
                other.id(),
                ProductPatch {
                    sku: Some(sku.clone()),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Conflict { .. })));

        store.delete(first.id()).await.unwrap();
        store.delete(other.id()).await.unwrap();
    }
}
