//! Request handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::task::{GenerationRequest, Task};
use crate::AppState;

/// Intake acknowledgement
#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub task_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// `POST /generate`
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AcceptedResponse>)> {
    let Json(request) = payload?;

    // The pipeline handle is dropped; the task reports through the registry
    let (task, _handle) = state.orchestrator.submit(request)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedResponse {
            status: "processing",
            message: "Your mockup is being generated. You'll receive an email when it's ready.",
            task_id: task.id(),
            created_at: task.created_at,
        }),
    ))
}

/// `GET /task/:task_id`
pub async fn task_status(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>> {
    let id = Uuid::parse_str(&task_id).map_err(|_| AppError::TaskNotFound(task_id.clone()))?;
    let task = state.registry.get(&id)?;
    Ok(Json(task))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Website Mockup Generator API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/api/docs",
    }))
}

/// `GET /api/docs`
pub async fn docs() -> Json<Value> {
    Json(json!({
        "endpoints": [
            {"method": "POST", "path": "/api/v1/generate", "description": "Submit a mockup request"},
            {"method": "GET", "path": "/api/v1/task/{task_id}", "description": "Poll task status"},
            {"method": "GET", "path": "/api/v1/health", "description": "Health check"},
        ],
    }))
}
