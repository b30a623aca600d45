use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{error, info, instrument};

use crate::datalayer::CRUD::helper::row_json::row_to_json;
use crate::datalayer::db_ops::connection_pool::CarPool;
use crate::datalayer::db_ops::constants::CARS_BY_MAKE;
use crate::errors::{ServiceError, ServiceResult};

/// One row of the `cars` table, keyed by column name
pub type CarRecord = Map<String, Value>;

/// Read access to the car catalogue
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Rows whose `MAKE` equals `make`.
    ///
    /// `None` is bound as SQL `NULL`, which matches no row.
    async fn models_by_make(&self, make: Option<String>) -> ServiceResult<Vec<CarRecord>>;

    /// Cheap connectivity probe
    async fn ping(&self) -> ServiceResult<()>;
}

#[async_trait]
impl CarStore for CarPool {
    #[instrument(skip(self), fields(service = "cars"))]
    async fn models_by_make(&self, make: Option<String>) -> ServiceResult<Vec<CarRecord>> {
        let rows = sqlx::query(CARS_BY_MAKE)
            .bind(make)
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to query cars by make");
                ServiceError::from(e)
            })?;

        info!(rows = rows.len(), "Fetched car models");

        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn ping(&self) -> ServiceResult<()> {
        self.health_check().await
    }
}
