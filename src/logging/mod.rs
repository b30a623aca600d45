pub mod telemetry;

pub use telemetry::{TelemetryConfig, create_counter, init_telemetry, shutdown_telemetry};
