//! Log store construction from [`StoreConfig`].

use std::sync::Arc;

use hookrelay_db::store::{LogStore, PgLogStore, RestLogStore};

use crate::config::StoreConfig;

/// Errors raised while connecting to the configured log store.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Database health check failed: {0}")]
    HealthCheck(#[source] sqlx::Error),

    #[error("Failed to run database migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Connect the configured backend. Postgres pools are health-checked and
/// migrated before use; the REST store is used as-is.
pub async fn connect_store(
    config: &StoreConfig,
    client: reqwest::Client,
) -> Result<Arc<dyn LogStore>, ConnectError> {
    match config {
        StoreConfig::Postgres {
            url,
            max_connections,
        } => {
            let pool = hookrelay_db::create_pool(url, *max_connections)
                .await
                .map_err(ConnectError::Connect)?;
            tracing::info!(max_connections, "Database connection pool created");

            hookrelay_db::health_check(&pool)
                .await
                .map_err(ConnectError::HealthCheck)?;
            tracing::info!("Database health check passed");

            hookrelay_db::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgLogStore::new(pool)))
        }
        StoreConfig::Rest {
            url,
            api_key,
            table,
        } => {
            let store = RestLogStore::new(client, url, api_key.clone(), table);
            tracing::info!(table_url = %store.table_url(), "Using hosted REST log store");
            Ok(Arc::new(store))
        }
    }
}
