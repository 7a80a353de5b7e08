use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// HTTP header carrying the request id on responses
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Middleware that assigns a unique id to each request and propagates it
/// through the request lifecycle.
///
/// The request id is:
/// - Generated as a UUID v4 per request
/// - Added to the request extensions for access by handlers
/// - Included in all log entries via the request span
/// - Echoed in the response headers, so the generic error bodies stay
///   correlatable with server logs
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let span = info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
    );

    let mut request = request;
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let response = async move {
        tracing::info!("Request started");

        let response = next.run(request).await;

        tracing::info!(status = %response.status(), "Request completed");

        response
    }
    .instrument(span)
    .await;

    let (mut parts, body) = response.into_parts();
    parts.headers.insert(
        REQUEST_ID_HEADER,
        HeaderValue::from_str(&request_id).unwrap_or_else(|_| HeaderValue::from_static("invalid")),
    );

    Response::from_parts(parts, body)
}

/// Extension type carrying the request id
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

impl RequestId {
    /// Get the request id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
