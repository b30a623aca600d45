pub mod CRUD;
pub mod db_ops;

pub use db_ops::{CarPool, DatabaseHealth, DbConfig};

use crate::errors::ServiceResult;

/// Initialize the process-wide car pool from the environment.
///
/// Idempotent: later calls return the pool created by the first one.
pub fn initialize_database() -> ServiceResult<&'static CarPool> {
    tracing::info!("=== Database Initialization Started ===");

    let config = DbConfig::from_env()?;
    let pool = CarPool::global(Some(config))?;

    tracing::info!("=== Database Initialization Completed ===");

    Ok(pool)
}
