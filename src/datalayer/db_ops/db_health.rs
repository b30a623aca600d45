use sqlx::mysql::MySqlPool;
use tracing::{error, info, warn};

use crate::datalayer::db_ops::constants::CARS_TABLE;

/// Database health status
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DatabaseHealth {
    pub is_healthy: bool,
    pub latency_ms: u64,
    pub pool_size: u32,
    pub idle_connections: usize,
}

/// Table verification result
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TableVerification {
    pub table_name: String,
    pub exists: bool,
    pub row_count: Option<i64>,
}

/// Verifies database connectivity and returns health metrics
pub async fn check_database_health(pool: &MySqlPool) -> Result<DatabaseHealth, sqlx::Error> {
    let start = std::time::Instant::now();

    sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        error!("Database health check failed: {}", e);
        e
    })?;

    let latency = start.elapsed();

    Ok(DatabaseHealth {
        is_healthy: true,
        latency_ms: latency.as_millis() as u64,
        pool_size: pool.size(),
        idle_connections: pool.num_idle(),
    })
}

/// Check if a table exists in the connected schema
pub async fn check_table_exists(pool: &MySqlPool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM information_schema.tables
            WHERE table_schema = DATABASE()
            AND table_name = ?",
    )
    .bind(table_name)
    .fetch_one(pool)
    .await?;

    Ok(result.0 > 0)
}

/// Verify the `cars` table exists and count its rows
pub async fn verify_car_table(pool: &MySqlPool) -> Result<TableVerification, sqlx::Error> {
    let exists = check_table_exists(pool, CARS_TABLE).await?;

    let row_count = if exists {
        match sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM cars")
            .fetch_one(pool)
            .await
        {
            Ok(count) => Some(count.0),
            Err(e) => {
                error!("Failed to get row count for table {}: {}", CARS_TABLE, e);
                None
            }
        }
    } else {
        None
    };

    Ok(TableVerification {
        table_name: CARS_TABLE.to_string(),
        exists,
        row_count,
    })
}

/// Best-effort startup probe.
///
/// The pool connects lazily, so an unreachable database is only reported
/// here; lookups keep answering with 503 until it comes back.
pub async fn log_startup_status(pool: &MySqlPool) {
    info!("Checking car catalogue database...");

    match check_database_health(pool).await {
        Ok(health) => info!(
            latency_ms = health.latency_ms,
            pool_size = health.pool_size,
            "Database is reachable"
        ),
        Err(e) => {
            warn!(error = %e, "Database is not reachable yet, continuing startup");
            return;
        }
    }

    match verify_car_table(pool).await {
        Ok(TableVerification {
            exists: true,
            row_count,
            ..
        }) => info!(rows = ?row_count, "Table '{}' exists", CARS_TABLE),
        Ok(_) => warn!("Table '{}' does not exist, lookups will fail", CARS_TABLE),
        Err(e) => warn!(error = %e, "Failed to verify table '{}'", CARS_TABLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datalayer::db_ops::connection_pool::CarPool;
    use crate::datalayer::db_ops::constants::DbConfig;

    #[tokio::test]
    async fn test_database_health_check() {
        if std::env::var("DATABASE_HOST_ADDRESS").is_err() {
            return;
        }

        let pool = CarPool::new(&DbConfig::from_env().unwrap());
        let health = check_database_health(pool.pool()).await.unwrap();
        assert!(health.is_healthy);
        pool.close().await;
    }

    #[tokio::test]
    async fn test_verify_car_table() {
        if std::env::var("DATABASE_HOST_ADDRESS").is_err() {
            return;
        }

        let pool = CarPool::new(&DbConfig::from_env().unwrap());
        let verification = verify_car_table(pool.pool()).await.unwrap();
        assert_eq!(verification.table_name, "cars");
        if verification.exists {
            assert!(verification.row_count.is_some());
        }
        pool.close().await;
    }
}
