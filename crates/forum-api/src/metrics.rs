//! Prometheus metrics for request traffic and form action outcomes.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use crate::{ApiState, error::ApiError};

/// Label for requests that matched no route
const UNMATCHED_PATH: &str = "unmatched";

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new();

    // Configure histogram buckets for request duration (in seconds)
    let builder = builder.set_buckets_for_metric(
        Matcher::Full("http_request_duration_seconds".to_string()),
        &[
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ],
    )?;

    // Install the exporter and get the handle
    let handle = builder.install_recorder()?;

    Ok(handle)
}

/// Middleware to record HTTP request metrics
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();

    let path = route_label(&req);

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// The route template a request matched, so slugs and ids never become labels
fn route_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_PATH.to_string(), |path| path.as_str().to_string())
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(state): State<ApiState>) -> Result<Response, ApiError> {
    let handle = state.metrics.as_ref().ok_or(ApiError::MetricsDisabled)?;
    Ok((StatusCode::OK, handle.render()).into_response())
}

/// Record the outcome of a form action
pub fn record_action(action: &'static str, outcome: &'static str) {
    counter!(
        "forum_actions_total",
        "action" => action,
        "outcome" => outcome
    )
    .increment(1);
}
