use sqlx::MySql;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use tracing::{error, info};

use crate::datalayer::db_ops::constants::{CAR_POOL, DbConfig};
use crate::errors::{ServiceError, ServiceResult};

/*
Process-wide MySQL pool for the car catalogue.

The pool connects lazily: creating it never touches the network, so the
service starts even when the database is down and each lookup reports the
outage on its own. Connections go back to the pool when dropped.
*/

/// Connection pool wrapper for the MySQL car catalogue
#[derive(Clone)]
pub struct CarPool {
    pool: MySqlPool,
}

impl std::fmt::Debug for CarPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarPool")
            .field("size", &self.pool.size())
            .field("idle", &self.pool.num_idle())
            .field("closed", &self.pool.is_closed())
            .finish()
    }
}

impl CarPool {
    /// Creates a lazily connecting pool from the given configuration
    pub fn new(config: &DbConfig) -> Self {
        info!(
            host = %config.host,
            port = config.port,
            database = ?config.database_name,
            max_connections = config.max_connections,
            "Creating car catalogue connection pool"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(0)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect_lazy_with(config.connect_options());

        Self { pool }
    }

    /// Creates or returns the global pool.
    ///
    /// The first call must supply a configuration; later calls return the
    /// same instance whatever they pass.
    pub fn global(config: Option<DbConfig>) -> ServiceResult<&'static CarPool> {
        if let Some(pool) = CAR_POOL.get() {
            return Ok(pool);
        }

        let config = config.ok_or_else(|| {
            error!("Car pool is not initialized and no configuration was provided");
            ServiceError::ConfigurationError("database configuration is not initialized".to_string())
        })?;

        Ok(CAR_POOL.get_or_init(|| CarPool::new(&config)))
    }

    /// Gets a connection from the pool
    pub async fn get(&self) -> ServiceResult<PoolConnection<MySql>> {
        self.pool.acquire().await.map_err(|e| {
            error!(error = %e, "Failed to acquire connection from pool");
            ServiceError::from(e)
        })
    }

    /// Closes the pool and waits for checked-out connections to come back
    pub async fn close(&self) {
        info!("Closing car catalogue connection pool...");
        self.pool.close().await;
        info!("Car catalogue connection pool closed");
    }

    /// Gets a reference to the underlying MySqlPool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Returns the current size of the pool (total connections)
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    /// Returns the number of idle connections in the pool
    pub fn idle_count(&self) -> usize {
        self.pool.num_idle()
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Health check - verifies that the pool can acquire a connection and run a query
    pub async fn health_check(&self) -> ServiceResult<()> {
        let mut conn = self.get().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await.map_err(|e| {
            error!(error = %e, "Health check query failed");
            ServiceError::from(e)
        })?;
        Ok(())
    }
}
