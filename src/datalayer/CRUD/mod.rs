pub mod cars;
pub mod helper;

pub use cars::{CarRecord, CarStore};
