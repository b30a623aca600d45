pub mod connection_pool;
pub mod constants;
pub mod db_health;

pub use connection_pool::CarPool;
pub use constants::DbConfig;
pub use db_health::{DatabaseHealth, TableVerification, check_database_health, log_startup_status};
