//! Health check endpoints for service monitoring.

use crate::{db::DbPool, error::AppError};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Readiness response.
///
/// Returns service status and database connectivity.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: String,
    pub message: String,
}

/// Liveness check. Never touches the database.
///
/// # Response (200 OK)
///
/// ```json
/// { "status": "OK", "message": "Pong" }
/// ```
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "OK".to_string(),
        message: "Pong".to_string(),
    })
}

/// Readiness check.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "database": "connected",
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// # Response (500 Internal Server Error)
///
/// If database is unreachable, returns standard error response.
pub async fn health_check(State(pool): State<DbPool>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        timestamp: Utc::now(),
    }))
}
