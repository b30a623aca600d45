use axum::{extract::Request, middleware::Next, response::Response};

/// Logs every request that ends in a 4xx or 5xx status
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<uuid::Uuid>()
        .map(|id| id.to_string());
    let uri = request.uri().clone();

    let response = next.run(request).await;

    if response.status().is_server_error() {
        tracing::error!(
            status = %response.status(),
            uri = %uri,
            request_id = ?request_id,
            "Request failed"
        );
    } else if response.status().is_client_error() {
        tracing::warn!(
            status = %response.status(),
            uri = %uri,
            request_id = ?request_id,
            "Request rejected"
        );
    }

    response
}
