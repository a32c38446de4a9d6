use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS for browser form submissions from the configured origins
///
/// Credentials are allowed so the session cookie is sent along.
pub fn create_cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let origins = allowed_origins
        .into_iter()
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
