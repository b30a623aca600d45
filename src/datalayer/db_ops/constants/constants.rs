use crate::datalayer::db_ops::connection_pool::CarPool;
use std::sync::OnceLock;
use std::time::Duration;

// Connection parameters read from the environment
pub const DATABASE_NAME_VAR: &str = "DATABASE_NAME";
pub const DATABASE_HOST_VAR: &str = "DATABASE_HOST_ADDRESS";
pub const DATABASE_PASSWORD_VAR: &str = "DATABASE_PASSWORD";
pub const DATABASE_PORT_VAR: &str = "DATABASE_PORT";
pub const DATABASE_USER_VAR: &str = "DATABASE_USER";
pub const DATABASE_MAX_CONNECTIONS_VAR: &str = "DATABASE_MAX_CONNECTIONS";
pub const DATABASE_ACQUIRE_TIMEOUT_VAR: &str = "DATABASE_ACQUIRE_TIMEOUT_SECS";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(600);
pub const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(1800);

pub const CARS_TABLE: &str = "cars";
pub const CARS_BY_MAKE: &str = "SELECT * FROM cars WHERE MAKE = ?";

// Process-wide pool, set once at startup and shared by every invocation
pub static CAR_POOL: OnceLock<CarPool> = OnceLock::new();
