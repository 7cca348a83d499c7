//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

/// SQLSTATE raised when `lock_timeout` expires while waiting for a row lock.
const LOCK_NOT_AVAILABLE: &str = "55P03";

/// Name of the storage-level `balance >= 0` constraint (see `migrations/`).
pub const BALANCE_CONSTRAINT: &str = "check_balance_non_negative";

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Domain Errors**: the wallet is missing or cannot cover a withdrawal
/// - **Validation Errors**: the request or the amount is malformed
/// - **Storage Errors**: the database is unreachable, a lock wait timed out, or a query failed
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No wallet with the requested id exists.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Wallet not found")]
    WalletNotFound,

    /// Withdrawal exceeds the balance read under the row lock.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Amount is not positive, or applying it would overflow the balance.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Request path or body failed validation before reaching the engine.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Invalid request data: {0}")]
    Validation(String),

    /// The database could not be reached (pool exhausted, connection or TLS failure).
    ///
    /// Returns HTTP 500, retryable.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] sqlx::Error),

    /// Waiting for the wallet row lock exceeded `lock_timeout`.
    ///
    /// Returns HTTP 500, retryable.
    #[error("Timed out waiting for wallet lock")]
    LockTimeout,

    /// Any other database failure.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl AppError {
    /// Whether the caller may safely retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StorageUnavailable(_) | AppError::LockTimeout)
    }
}

/// Classify driver errors into the application taxonomy.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some(LOCK_NOT_AVAILABLE) {
                return AppError::LockTimeout;
            }
            // The storage constraint caught a negative balance the engine let through
            if db_err.constraint() == Some(BALANCE_CONSTRAINT) {
                return AppError::InsufficientFunds;
            }
        }

        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => AppError::StorageUnavailable(err),
            other => AppError::Database(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `WalletNotFound` → 404 Not Found
/// - `InsufficientFunds` → 400 Bad Request
/// - `InvalidAmount`, `Validation` → 422 Unprocessable Entity
/// - everything else → 500 Internal Server Error (details are logged, never returned)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::WalletNotFound => {
                (StatusCode::NOT_FOUND, "wallet_not_found", self.to_string())
            }
            AppError::InsufficientFunds => (
                StatusCode::BAD_REQUEST,
                "insufficient_funds",
                self.to_string(),
            ),
            AppError::InvalidAmount(ref msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_amount", msg.clone())
            }
            AppError::Validation(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                msg.clone(),
            ),
            AppError::StorageUnavailable(_) | AppError::LockTimeout | AppError::Database(_) => {
                tracing::error!(error = %self, retryable = self.is_retryable(), "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        let mut response = (status, body).into_response();
        if self.is_retryable() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}
