use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::error_handler::ErrorBody;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Caps how much of a framework error body is copied into the JSON message.
const MAX_ERROR_BODY: usize = 16 * 1024;

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Reuses the caller's request id when it is usable, otherwise makes one up.
fn request_id(headers: &HeaderMap) -> HeaderValue {
    if let Some(v) = headers.get(REQUEST_ID_HEADER) {
        if v.to_str().is_ok_and(|s| !s.trim().is_empty()) {
            return v.clone();
        }
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    // Only ASCII digits, always a valid header value.
    HeaderValue::from_str(&format!("req-{nanos}")).unwrap_or(HeaderValue::from_static("req-0"))
}

/// Error message for a framework-generated response body.
fn message_for(status: axum::http::StatusCode, bytes: &Bytes) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        text.to_string()
    }
}

/// Tags every response with `X-Request-Id` and rewrites error responses that
/// are not JSON yet (axum's 405/413/415 rejections, for example) into the
/// `{"error": ...}` shape. `Allow` and other headers are kept.
pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let id = request_id(req.headers());
    let mut res = next.run(req).await;
    res.headers_mut().insert(REQUEST_ID_HEADER, id);

    let status = res.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(res.headers()) {
        return res;
    }

    let (mut parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_ERROR_BODY)
        .await
        .unwrap_or_default();

    let envelope = ErrorBody {
        error: message_for(status, &bytes),
    };
    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, Body::from(body))
}
