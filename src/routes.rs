use axum::{
    Router,
    middleware::from_fn,
    routing::{any, get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{health, invoke, models};
use crate::middleware::{error_logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Create the main application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Health routes
    let health_routes = Router::new()
        .route("/alive", any(health::alive))
        .route("/ready", get(health::ready));

    // Model lookup routes - /models
    let model_routes = Router::new()
        .route("/models", get(models::get_models_without_make))
        .route("/models/:make", get(models::get_models));

    // Function invocation, same path as the platform's invoke API
    let invoke_routes = Router::new().route(
        "/2015-03-31/functions/:function/invocations",
        post(invoke::invoke),
    );

    Router::new()
        .merge(health_routes)
        .merge(model_routes)
        .merge(invoke_routes)
        .layer(from_fn(error_logging_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
