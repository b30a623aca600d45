pub mod health;

pub use health::{AliveHandler, AliveResponse, ReadyResponse, liveness, readiness};
