use axum::{
    extract::{Path, State},
    http::Uri,
};
use tracing::{info, instrument};

use crate::controllayer::models::MAKE_PARAMETER;
use crate::controllayer::{ApiGatewayEvent, RequestHandler, ResponseEnvelope};
use crate::state::AppState;

/// GET /models/:make
/// List the car models of one make
#[instrument(skip(state, uri), fields(service = "/models/:make"))]
pub async fn get_models(
    State(state): State<AppState>,
    Path(make): Path<String>,
    uri: Uri,
) -> ResponseEnvelope {
    let event = ApiGatewayEvent::new()
        .with_http_method("GET")
        .with_path(uri.path())
        .with_path_parameter(MAKE_PARAMETER, make);

    let response = state.models.handle(event).await;
    info!(response_code = response.status_code, "Models lookup completed");
    response
}

/// GET /models
/// Lookup without a make; matches no rows
#[instrument(skip(state, uri), fields(service = "/models"))]
pub async fn get_models_without_make(State(state): State<AppState>, uri: Uri) -> ResponseEnvelope {
    let event = ApiGatewayEvent::new()
        .with_http_method("GET")
        .with_path(uri.path());

    let response = state.models.handle(event).await;
    info!(response_code = response.status_code, "Models lookup completed");
    response
}
