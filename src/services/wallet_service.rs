//! Wallet service - balance reads and concurrency-safe balance mutations.
//!
//! This service handles:
//! - Unlocked balance reads
//! - Deposits and withdrawals under an exclusive row lock
//! - Balance validation against the locked, up-to-date value
//!
//! # Locking Protocol
//!
//! Every mutation runs in one PostgreSQL transaction:
//!
//! 1. Begin transaction
//! 2. `SELECT ... FOR UPDATE` the wallet row (waits for any other mutator of the same wallet)
//! 3. Compute the new balance from the locked row only
//! 4. Write it back and commit, which releases the lock
//!
//! Mutations of one wallet are therefore applied strictly one at a time, while different
//! wallets never contend. Any error returns before commit, and the transaction is rolled
//! back so the balance is untouched. Nothing is retried here: without an idempotency key a
//! retried withdrawal could be applied twice.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::wallet::{OperationType, Wallet},
    services::wallet_store,
};

/// Get the current state of a wallet.
///
/// Does not take the row lock, so it never waits on (or delays) a mutation. A read that
/// races a mutation returns either the balance before or after it, never anything in between.
///
/// # Errors
///
/// - `WalletNotFound`: Wallet doesn't exist
/// - `StorageUnavailable` / `Database`: Database error occurred
pub async fn get_balance(pool: &DbPool, wallet_id: Uuid) -> Result<Wallet, AppError> {
    tracing::debug!(wallet_uuid = %wallet_id, "Fetching wallet");

    let wallet = wallet_store::fetch_wallet(pool, wallet_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(wallet_uuid = %wallet_id, "Wallet not found");
            AppError::WalletNotFound
        })?;

    tracing::debug!(wallet_uuid = %wallet_id, balance = wallet.balance, "Wallet found");
    Ok(wallet)
}

/// Apply a deposit or withdrawal.
pub async fn apply(
    pool: &DbPool,
    wallet_id: Uuid,
    operation: OperationType,
    amount: i64,
) -> Result<Wallet, AppError> {
    match operation {
        OperationType::Deposit => deposit(pool, wallet_id, amount).await,
        OperationType::Withdraw => withdraw(pool, wallet_id, amount).await,
    }
}

/// Deposit into a wallet (increase its balance).
///
/// # Process
///
/// 1. Validate amount
/// 2. Start database transaction
/// 3. Lock the wallet row and read its balance
/// 4. Write `balance + amount`
/// 5. Commit (or rollback on error)
///
/// # Returns
///
/// The wallet with its new balance
///
/// # Errors
///
/// - `InvalidAmount`: Amount is zero or negative, or the sum would overflow
/// - `WalletNotFound`: Wallet doesn't exist
/// - `LockTimeout`: Waited too long for a concurrent mutation of the same wallet
/// - `StorageUnavailable` / `Database`: Database error occurred
pub async fn deposit(pool: &DbPool, wallet_id: Uuid, amount: i64) -> Result<Wallet, AppError> {
    ensure_positive(amount)?;
    tracing::info!(wallet_uuid = %wallet_id, amount, "Depositing into wallet");

    let mut tx = pool.begin().await?;

    let wallet = match wallet_store::lock_wallet(&mut tx, wallet_id).await? {
        Some(wallet) => wallet,
        None => {
            tx.rollback().await?;
            tracing::warn!(wallet_uuid = %wallet_id, "Wallet not found");
            return Err(AppError::WalletNotFound);
        }
    };

    let Some(new_balance) = wallet.balance.checked_add(amount) else {
        tx.rollback().await?;
        return Err(AppError::InvalidAmount(
            "amount would overflow the wallet balance".to_string(),
        ));
    };

    let updated = wallet_store::store_balance(&mut tx, wallet_id, new_balance).await?;

    // Commit releases the row lock
    tx.commit().await?;

    tracing::info!(
        wallet_uuid = %wallet_id,
        amount,
        old_balance = wallet.balance,
        new_balance = updated.balance,
        "Deposit completed"
    );

    Ok(updated)
}

/// Withdraw from a wallet (decrease its balance).
///
/// The sufficiency check uses the balance read under the lock, never a value
/// read before it was acquired.
///
/// # Errors
///
/// - `InvalidAmount`: Amount is zero or negative
/// - `WalletNotFound`: Wallet doesn't exist
/// - `InsufficientFunds`: Balance is lower than the amount
/// - `LockTimeout`: Waited too long for a concurrent mutation of the same wallet
/// - `StorageUnavailable` / `Database`: Database error occurred
pub async fn withdraw(pool: &DbPool, wallet_id: Uuid, amount: i64) -> Result<Wallet, AppError> {
    ensure_positive(amount)?;
    tracing::info!(wallet_uuid = %wallet_id, amount, "Withdrawing from wallet");

    let mut tx = pool.begin().await?;

    let wallet = match wallet_store::lock_wallet(&mut tx, wallet_id).await? {
        Some(wallet) => wallet,
        None => {
            tx.rollback().await?;
            tracing::warn!(wallet_uuid = %wallet_id, "Wallet not found");
            return Err(AppError::WalletNotFound);
        }
    };

    if wallet.balance < amount {
        tx.rollback().await?;
        tracing::warn!(
            wallet_uuid = %wallet_id,
            requested_amount = amount,
            current_balance = wallet.balance,
            "Insufficient funds"
        );
        return Err(AppError::InsufficientFunds);
    }

    let updated =
        wallet_store::store_balance(&mut tx, wallet_id, wallet.balance - amount).await?;

    tx.commit().await?;

    tracing::info!(
        wallet_uuid = %wallet_id,
        amount,
        old_balance = wallet.balance,
        new_balance = updated.balance,
        "Withdrawal completed"
    );

    Ok(updated)
}

fn ensure_positive(amount: i64) -> Result<(), AppError> {
    if amount <= 0 {
        return Err(AppError::InvalidAmount(
            "amount must be positive".to_string(),
        ));
    }
    Ok(())
}
