// handlers/public/mod.rs - Public handlers (no authentication)

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::error::ApiError;

/// GET /api/health - liveness only, never touches the store
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Server is running"
    }))
}

/// GET / - service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Task Board API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health (public)",
            "auth": "/api/auth/register, /api/auth/me (protected)",
            "boards": "/api/boards[/:id] (protected)",
            "todos": "/api/todos[/:id][/toggle], /api/todos/board/:boardId (protected)",
        }
    }))
}

/// Fallback for unknown routes
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ApiError::not_found("Route not found").to_json()))
}
