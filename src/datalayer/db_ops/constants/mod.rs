pub mod constants;
pub mod types;
pub use constants::{CAR_POOL, CARS_BY_MAKE, CARS_TABLE};
pub use types::DbConfig;
