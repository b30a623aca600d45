use opentelemetry::{KeyValue, global, metrics::Counter, trace::TracerProvider as _};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, runtime, trace::Config};
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const METER_NAME: &str = "car-models-service";

/// Where logs go and whether spans/metrics leave the process
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    /// Collector address, e.g. `http://localhost:4317`
    pub otlp_endpoint: String,
    pub export_traces: bool,
    pub export_metrics: bool,
    /// Fallback filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: env!("CARGO_PKG_NAME").to_string(),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            export_traces: env_flag("OTEL_ENABLE_TRACING"),
            export_metrics: env_flag("OTEL_ENABLE_METRICS"),
            log_level: "info".to_string(),
        }
    }
}

// Export is opt-in; a function host rarely runs a collector next to it
fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(false)
}

impl TelemetryConfig {
    pub fn with_otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = endpoint.into();
        self
    }

    pub fn with_export(mut self, traces: bool, metrics: bool) -> Self {
        self.export_traces = traces;
        self.export_metrics = metrics;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber: fmt logs always, OTLP export when enabled
pub fn init_telemetry(config: Option<TelemetryConfig>) -> Result<(), Box<dyn std::error::Error>> {
    let config = config.unwrap_or_default();
    let resource = Resource::new([KeyValue::new(SERVICE_NAME, config.service_name.clone())]);

    let otel_layer = if config.export_traces {
        let provider = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(
                opentelemetry_otlp::new_exporter()
                    .tonic()
                    .with_endpoint(&config.otlp_endpoint),
            )
            .with_trace_config(Config::default().with_resource(resource.clone()))
            .install_batch(runtime::Tokio)?;
        global::set_tracer_provider(provider.clone());

        Some(tracing_opentelemetry::layer().with_tracer(provider.tracer(METER_NAME)))
    } else {
        None
    };

    if config.export_metrics {
        let provider = opentelemetry_otlp::new_pipeline()
            .metrics(runtime::Tokio)
            .with_exporter(
                opentelemetry_otlp::new_exporter()
                    .tonic()
                    .with_endpoint(&config.otlp_endpoint),
            )
            .with_resource(resource)
            .build()?;
        global::set_meter_provider(provider);
    }

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .with(otel_layer)
        .try_init()?;

    info!(
        service = %config.service_name,
        export_traces = config.export_traces,
        export_metrics = config.export_metrics,
        "Telemetry initialized"
    );

    Ok(())
}

/// Flush pending spans before the process exits
pub fn shutdown_telemetry() {
    info!("Shutting down telemetry");
    global::shutdown_tracer_provider();
}

/// Counter on the service meter; a no-op until a meter provider is installed
pub fn create_counter(name: &str, description: &str) -> Counter<u64> {
    global::meter(METER_NAME)
        .u64_counter(name.to_string())
        .with_description(description.to_string())
        .init()
}
