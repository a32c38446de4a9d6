//! Request ID middleware.
//!
//! Every request runs inside a `request` span carrying its ID, so action
//! logs for one form submission can be correlated.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the request ID in both directions
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Preserve the caller's `X-Request-ID` or generate one
pub async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        uri = %req.uri(),
    );

    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value);
    }

    response
}
