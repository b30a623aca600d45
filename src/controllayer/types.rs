use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{error, warn};

pub const CORS_ALLOW_ORIGIN_HEADER: &str = "Access-Control-Allow-Origin";
pub const CORS_ALLOW_ORIGIN_ANY: &str = "*";

const ENCODING_FAILURE_BODY: &str =
    r#"{"error":{"code":"INTERNAL_SERVER_ERROR","message":"Failed to encode response"}}"#;

/// Inbound event as delivered by the function platform.
///
/// Only `pathParameters` drives behavior; method and path are kept for logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
}

impl ApiGatewayEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_http_method(mut self, method: impl Into<String>) -> Self {
        self.http_method = Some(method.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Look up a named path parameter
    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }
}

/// Outbound envelope returned to the function platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub body: String,
    pub headers: BTreeMap<String, String>,
    pub status_code: u16,
}

impl ResponseEnvelope {
    /// Encode `payload` as the JSON body and attach the CORS header
    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Self {
        let (status, body) = match serde_json::to_string(payload) {
            Ok(body) => (status, body),
            Err(e) => {
                error!(error = %e, "Failed to encode response body");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ENCODING_FAILURE_BODY.to_string(),
                )
            }
        };

        let mut headers = BTreeMap::new();
        headers.insert(
            CORS_ALLOW_ORIGIN_HEADER.to_string(),
            CORS_ALLOW_ORIGIN_ANY.to_string(),
        );

        Self {
            body,
            headers,
            status_code: status.as_u16(),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Turns an envelope into a plain HTTP response when served through axum
impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        for (name, value) in self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "Dropping invalid response header"),
            }
        }

        response
    }
}

/// A single-shot function from one event to one envelope.
///
/// Implementations must answer every event with an envelope, failures included.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, event: ApiGatewayEvent) -> ResponseEnvelope;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_platform_json() {
        let raw = r#"{
            "resource": "/models/{make}",
            "path": "/models/Toyota",
            "httpMethod": "GET",
            "pathParameters": { "make": "Toyota" },
            "queryStringParameters": null
        }"#;

        let event: ApiGatewayEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.path_parameter("make"), Some("Toyota"));
        assert_eq!(event.http_method.as_deref(), Some("GET"));
        assert_eq!(event.path.as_deref(), Some("/models/Toyota"));
    }

    #[test]
    fn test_event_with_null_path_parameters() {
        let event: ApiGatewayEvent = serde_json::from_str(r#"{"pathParameters":null}"#).unwrap();
        assert_eq!(event.path_parameter("make"), None);

        let empty: ApiGatewayEvent = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ApiGatewayEvent::new());
    }

    #[test]
    fn test_envelope_serializes_platform_field_names() {
        let envelope = ResponseEnvelope::json(StatusCode::OK, &serde_json::json!({"ok": true}));
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["body"], r#"{"ok":true}"#);
        assert_eq!(value["headers"]["Access-Control-Allow-Origin"], "*");
    }

    #[tokio::test]
    async fn test_envelope_into_response() {
        let envelope = ResponseEnvelope::json(StatusCode::CREATED, &serde_json::json!([1, 2]));
        let response = envelope.into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["content-type"], "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"[1,2]");
    }

    #[test]
    fn test_invalid_header_is_dropped() {
        let mut envelope = ResponseEnvelope::json(StatusCode::OK, &true);
        envelope
            .headers
            .insert("bad header".to_string(), "x".to_string());

        let response = envelope.into_response();
        assert_eq!(response.headers().len(), 2);
    }
}
