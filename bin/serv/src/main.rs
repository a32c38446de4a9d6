use forum_api::{
    config::ApiConfig,
    metrics,
    middleware::{
        cors::create_cors_layer, request_id::request_id_middleware,
        security_headers::apply_security_headers,
    },
    state::ApiState,
    tracing::init_tracing,
};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    let config = ApiConfig::from_env()?;

    init_tracing(&config.env);

    let pool = forum_db::create_pool(&config.database_url, config.db_max_connections).await?;
    forum_db::ensure_db_and_migrate(&config.database_url, &pool).await?;

    let metrics_handle = metrics::init_metrics()?;
    let state = ApiState::new(&config, pool).with_metrics(metrics_handle);

    // Create the application router
    let app = forum_api::router::router()
        .layer(axum::middleware::from_fn(metrics::track_metrics))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(config.origins()))
        .with_state(state);
    let app = apply_security_headers(app, config.env);

    // Start the server
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
