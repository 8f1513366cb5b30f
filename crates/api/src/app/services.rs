use std::sync::Arc;

use anyhow::Context;
use stockpile_infra::{
    config::{DatabaseSettings, Settings},
    db, InMemoryProductStore, PostgresProductStore, ProductCatalog, ProductStore,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: ProductCatalog,
    pub project_name: String,
}

impl AppServices {
    pub fn new(store: Arc<dyn ProductStore>, project_name: impl Into<String>) -> Self {
        Self {
            catalog: ProductCatalog::new(store),
            project_name: project_name.into(),
        }
    }

    /// Services over a fresh in-memory store (dev/test).
    pub fn in_memory(project_name: impl Into<String>) -> Self {
        Self::new(Arc::new(InMemoryProductStore::new()), project_name)
    }
}

/// Select the store backend from settings.
///
/// With a database configured this connects (and migrates, unless disabled);
/// any failure there is fatal. Without one, the in-memory store is used.
pub async fn build_services(settings: &Settings) -> anyhow::Result<AppServices> {
    match &settings.database {
        Some(database) => {
            let store = connect_postgres(database).await?;
            Ok(AppServices::new(Arc::new(store), settings.project_name.clone()))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory product store (data is not persisted)");
            Ok(AppServices::in_memory(settings.project_name.clone()))
        }
    }
}

async fn connect_postgres(database: &DatabaseSettings) -> anyhow::Result<PostgresProductStore> {
    let pool = db::connect(database)
        .await
        .context("failed to connect to postgres")?;

    if database.run_migrations {
        db::run_migrations(&pool)
            .await
            .context("failed to run database migrations")?;
        tracing::info!("database migrations applied");
    }

    tracing::info!(max_connections = database.max_connections, "connected to postgres");
    Ok(PostgresProductStore::new(pool))
}
