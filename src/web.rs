use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::api::{self, ApiState};

/// Request deadline for the whole API surface; generous enough for a full
/// geocode fallback chain plus the forecast call.
const REQUEST_DEADLINE: Duration = Duration::from_secs(30);

pub async fn run(state: ApiState, port: u16) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new().nest("/api", api::router(state)).layer(
        ServiceBuilder::new()
            .layer(TimeoutLayer::new(REQUEST_DEADLINE))
            .layer(cors),
    );

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("API server running at http://localhost:{port}/api");
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
