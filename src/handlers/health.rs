use axum::{
    extract::State,
    http::{Method, Uri},
};
use tracing::{info, instrument};

use crate::controllayer::health::readiness;
use crate::controllayer::{ApiGatewayEvent, RequestHandler, ResponseEnvelope};
use crate::state::AppState;

/// ANY /alive
/// Liveness probe, answers every method
#[instrument(skip(state), fields(service = "/alive"))]
pub async fn alive(State(state): State<AppState>, method: Method, uri: Uri) -> ResponseEnvelope {
    let event = ApiGatewayEvent::new()
        .with_http_method(method.as_str())
        .with_path(uri.path());

    state.alive.handle(event).await
}

/// GET /ready
/// Readiness probe backed by a database ping
#[instrument(skip(state), fields(service = "/ready"))]
pub async fn ready(State(state): State<AppState>) -> ResponseEnvelope {
    let response = readiness(state.cars().as_ref()).await;
    info!(response_code = response.status_code, "Readiness check completed");
    response
}
