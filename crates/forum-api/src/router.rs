use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};

use crate::{metrics, post, state::ApiState, topic};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics_handler))
        .merge(topic::routes())
        .merge(post::routes())
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
