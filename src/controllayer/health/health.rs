use async_trait::async_trait;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::controllayer::types::{ApiGatewayEvent, RequestHandler, ResponseEnvelope};
use crate::datalayer::CRUD::cars::CarStore;

/// Liveness payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliveResponse {
    pub is_alive: bool,
}

/// Readiness payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    pub is_ready: bool,
}

/// Liveness probe
///
/// Answers every invocation with `{"isAlive":true}` and status 200.
/// The event is not inspected.
#[derive(Debug, Clone, Default)]
pub struct AliveHandler;

impl AliveHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RequestHandler for AliveHandler {
    #[instrument(skip(self, _event), fields(service = "alive"))]
    async fn handle(&self, _event: ApiGatewayEvent) -> ResponseEnvelope {
        info!("Going to return alive");
        liveness()
    }
}

/// The fixed liveness envelope
pub fn liveness() -> ResponseEnvelope {
    ResponseEnvelope::json(StatusCode::OK, &AliveResponse { is_alive: true })
}

/// Readiness probe
///
/// Returns 200 when the car store answers a ping, otherwise the
/// store's error envelope (503 when the database cannot be reached).
#[instrument(skip(store), fields(service = "ready"))]
pub async fn readiness(store: &dyn CarStore) -> ResponseEnvelope {
    match store.ping().await {
        Ok(()) => ResponseEnvelope::json(StatusCode::OK, &ReadyResponse { is_ready: true }),
        Err(e) => {
            error!(error = %e, "Readiness check failed");
            e.to_envelope()
        }
    }
}
