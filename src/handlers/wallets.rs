//! Wallet HTTP handlers.
//!
//! This module implements the wallet API endpoints:
//! - GET /api/v1/wallets/{wallet_uuid} - Get current balance
//! - POST /api/v1/wallets/{wallet_uuid}/operation - Deposit or withdraw

use crate::{
    db::DbPool,
    error::AppError,
    extract::{AppJson, AppPath},
    models::wallet::{WalletOperationRequest, WalletResponse},
    services::wallet_service,
};
use axum::{Json, extract::State};
use uuid::Uuid;

/// Get a wallet's balance.
///
/// # URL Parameters
///
/// - `wallet_uuid` - UUID of the wallet
///
/// # Response
///
/// - **Success (200 OK)**: `{"wallet_uuid": "...", "balance": 1000}`
/// - **Error (404)**: Wallet not found
/// - **Error (422)**: `wallet_uuid` is not a UUID
pub async fn get_wallet(
    State(pool): State<DbPool>,
    AppPath(wallet_id): AppPath<Uuid>,
) -> Result<Json<WalletResponse>, AppError> {
    let wallet = wallet_service::get_balance(&pool, wallet_id).await?;

    Ok(Json(wallet.into()))
}

/// Deposit into or withdraw from a wallet.
///
/// # Request Body
///
/// ```json
/// {
///   "operation_type": "WITHDRAW",
///   "amount": 300
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: Wallet with its new balance
/// - **Error (400)**: Insufficient funds for a withdrawal
/// - **Error (404)**: Wallet not found
/// - **Error (422)**: Malformed UUID, body, operation type or amount
pub async fn perform_operation(
    State(pool): State<DbPool>,
    AppPath(wallet_id): AppPath<Uuid>,
    AppJson(request): AppJson<WalletOperationRequest>,
) -> Result<Json<WalletResponse>, AppError> {
    // Reject bad amounts before the engine opens a transaction
    request.validate().map_err(AppError::Validation)?;

    let wallet =
        wallet_service::apply(&pool, wallet_id, request.operation_type, request.amount).await?;

    Ok(Json(wallet.into()))
}
