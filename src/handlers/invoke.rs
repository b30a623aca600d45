use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use tracing::{info, instrument, warn};

use crate::controllayer::{ApiGatewayEvent, ResponseEnvelope};
use crate::errors::{ServiceError, ServiceResult};
use crate::state::AppState;

/// POST /2015-03-31/functions/:function/invocations
/// Run a function against a raw platform event.
///
/// The handler's envelope, error envelopes included, comes back as the JSON
/// body of a 200; only an unknown function or an undecodable event is an
/// HTTP-level error. An empty body is treated as `{}`.
#[instrument(skip(state, body), fields(service = "/invocations"))]
pub async fn invoke(
    State(state): State<AppState>,
    Path(function): Path<String>,
    body: Bytes,
) -> ServiceResult<Json<ResponseEnvelope>> {
    let handler = state.function(&function).ok_or_else(|| {
        warn!(function = %function, "Unknown function");
        ServiceError::FunctionNotFound(function.clone())
    })?;

    let event: ApiGatewayEvent = if body.is_empty() {
        ApiGatewayEvent::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ServiceError::InvalidEvent(e.to_string()))?
    };

    let envelope = handler.handle(event).await;
    info!(
        function = %function,
        status_code = envelope.status_code,
        "Function invocation completed"
    );

    Ok(Json(envelope))
}
