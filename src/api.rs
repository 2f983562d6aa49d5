//! HTTP API exposing the tool registry.
//!
//! The agent runtime in front of this service discovers tools from
//! `GET /api/tools` and invokes them by name with a JSON argument object.
//! Streaming, session state, and model traffic are the runtime's problem,
//! not ours.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::SkycastError;
use crate::tools::ToolRegistry;

/// Shared state for the API handlers.
#[derive(Clone)]
pub struct ApiState {
    registry: Arc<ToolRegistry>,
}

impl ApiState {
    #[must_use]
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

/// Tool metadata as listed to the agent runtime.
#[derive(Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    time: DateTime<Utc>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(invoke_tool))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
        time: Utc::now(),
    })
}

async fn list_tools(State(state): State<ApiState>) -> Json<Vec<ToolDescriptor>> {
    let tools = state
        .registry
        .iter()
        .map(|tool| ToolDescriptor {
            name: tool.name(),
            description: tool.description(),
            parameters: tool.parameters(),
        })
        .collect();
    Json(tools)
}

async fn invoke_tool(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Json(args): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(tool) = state.registry.get(&name) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Unknown tool: {name}") })),
        ));
    };

    match tool.execute(args).await {
        Ok(result) => Ok(Json(result)),
        Err(error) => {
            warn!(tool = name, "Tool invocation failed: {error}");
            Err((
                error_status(&error),
                Json(json!({ "error": error.user_message() })),
            ))
        }
    }
}

fn error_status(error: &SkycastError) -> StatusCode {
    match error {
        SkycastError::Validation { .. } => StatusCode::BAD_REQUEST,
        SkycastError::Api { .. } => StatusCode::BAD_GATEWAY,
        SkycastError::Config { .. } => StatusCode::SERVICE_UNAVAILABLE,
        SkycastError::Io { .. } | SkycastError::General { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
