use async_trait::async_trait;
use axum::http::StatusCode;
use once_cell::sync::Lazy;
use opentelemetry::KeyValue;
use opentelemetry::metrics::Counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::controllayer::types::{ApiGatewayEvent, RequestHandler, ResponseEnvelope};
use crate::datalayer::CRUD::cars::{CarRecord, CarStore};
use crate::logging::create_counter;

/// Path parameter carrying the manufacturer name
pub const MAKE_PARAMETER: &str = "make";

static MODEL_LOOKUPS: Lazy<Counter<u64>> =
    Lazy::new(|| create_counter("models_lookups_total", "Car model lookups by outcome"));

/// Lookup payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsResponse {
    pub models_list: Vec<CarRecord>,
}

/// Lists the `cars` rows for the `make` path parameter.
///
/// A missing `make` still runs the query with a `NULL` parameter and
/// answers 200 with an empty list. Store failures become error envelopes
/// (503 when the database is unreachable, 500 otherwise).
#[derive(Clone)]
pub struct ModelsHandler {
    store: Arc<dyn CarStore>,
}

impl ModelsHandler {
    pub fn new(store: Arc<dyn CarStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CarStore> {
        &self.store
    }
}

#[async_trait]
impl RequestHandler for ModelsHandler {
    #[instrument(skip(self, event), fields(service = "get-models"))]
    async fn handle(&self, event: ApiGatewayEvent) -> ResponseEnvelope {
        let make = event.path_parameter(MAKE_PARAMETER).map(str::to_string);

        match &make {
            Some(make) => info!(make = %make, "Looking up car models"),
            None => info!("No make path parameter, lookup will match no rows"),
        }

        match self.store.models_by_make(make).await {
            Ok(models_list) => {
                info!(count = models_list.len(), "Car models retrieved successfully");
                MODEL_LOOKUPS.add(1, &[KeyValue::new("outcome", "ok")]);
                ResponseEnvelope::json(StatusCode::OK, &ModelsResponse { models_list })
            }
            Err(e) => {
                error!(error = %e, code = e.error_code(), "Car models lookup failed");
                MODEL_LOOKUPS.add(1, &[KeyValue::new("outcome", e.error_code())]);
                e.to_envelope()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datalayer::CRUD::cars::MockCarStore;
    use crate::errors::{ErrorResponse, ServiceError};
    use mockall::predicate::eq;
    use serde_json::json;

    fn car(make: &str, model: &str, year: i64) -> CarRecord {
        let value = json!({ "ID": year, "MAKE": make, "MODEL": model, "YEAR": year });
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_lookup_by_make() {
        let rows = vec![car("Toyota", "Corolla", 2019), car("Toyota", "Yaris", 2021)];
        let expected = rows.clone();

        let mut store = MockCarStore::new();
        store
            .expect_models_by_make()
            .with(eq(Some("Toyota".to_string())))
            .times(1)
            .returning(move |_| Ok(rows.clone()));

        let handler = ModelsHandler::new(Arc::new(store));
        let envelope = handler
            .handle(ApiGatewayEvent::new().with_path_parameter("make", "Toyota"))
            .await;

        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.header("Access-Control-Allow-Origin"), Some("*"));

        let body: ModelsResponse = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(body.models_list, expected);
    }

    #[tokio::test]
    async fn test_missing_make_binds_null() {
        let mut store = MockCarStore::new();
        store
            .expect_models_by_make()
            .with(eq(None))
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let handler = ModelsHandler::new(Arc::new(store));
        let envelope = handler.handle(ApiGatewayEvent::new()).await;

        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.body, r#"{"modelsList":[]}"#);
    }

    #[tokio::test]
    async fn test_other_path_parameters_are_ignored() {
        let mut store = MockCarStore::new();
        store
            .expect_models_by_make()
            .with(eq(None))
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let handler = ModelsHandler::new(Arc::new(store));
        let envelope = handler
            .handle(ApiGatewayEvent::new().with_path_parameter("model", "Corolla"))
            .await;

        assert_eq!(envelope.status_code, 200);
    }

    #[tokio::test]
    async fn test_database_down_is_503_every_time() {
        let mut store = MockCarStore::new();
        store
            .expect_models_by_make()
            .times(3)
            .returning(|_| Err(ServiceError::DatabaseConnectionError));

        let handler = ModelsHandler::new(Arc::new(store));
        let event = ApiGatewayEvent::new().with_path_parameter("make", "Honda");

        let first = handler.handle(event.clone()).await;
        let second = handler.handle(event.clone()).await;
        let third = handler.handle(event).await;

        assert_eq!(first.status_code, 503);
        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(first.header("Access-Control-Allow-Origin"), Some("*"));

        let body: ErrorResponse = serde_json::from_str(&first.body).unwrap();
        assert_eq!(body.error.code, "DATABASE_CONNECTION_ERROR");
    }

    #[tokio::test]
    async fn test_query_failure_is_500_without_driver_detail() {
        let mut store = MockCarStore::new();
        store.expect_models_by_make().times(1).returning(|_| {
            Err(ServiceError::DatabaseError(
                "Table 'garage.cars' doesn't exist".to_string(),
            ))
        });

        let handler = ModelsHandler::new(Arc::new(store));
        let envelope = handler
            .handle(ApiGatewayEvent::new().with_path_parameter("make", "Ford"))
            .await;

        assert_eq!(envelope.status_code, 500);
        assert!(!envelope.body.contains("garage.cars"));
        assert!(!envelope.body.contains("modelsList"));
    }
}
