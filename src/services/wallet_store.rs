//! Balance store - row-level access to the `wallets` table.
//!
//! The queries here are the only SQL in the crate that touches wallet balances.
//! Reads come in two flavours: a plain snapshot read (`fetch_wallet`) and a
//! locking read (`lock_wallet`) that must run inside the transaction which will
//! later call `store_balance`.

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{db::DbPool, error::AppError, models::wallet::Wallet};

/// Read a wallet without locking it.
///
/// Sees the latest committed balance at statement start.
pub async fn fetch_wallet(pool: &DbPool, wallet_id: Uuid) -> Result<Option<Wallet>, AppError> {
    let wallet = sqlx::query_as::<_, Wallet>(
        "SELECT id, balance, created_at FROM wallets WHERE id = $1",
    )
    .bind(wallet_id)
    .fetch_optional(pool)
    .await?;

    Ok(wallet)
}

/// Read a wallet and take an exclusive row lock on it.
///
/// Blocks while another transaction holds the lock; the lock is held until
/// `tx` commits or rolls back.
pub async fn lock_wallet(
    tx: &mut Transaction<'_, Postgres>,
    wallet_id: Uuid,
) -> Result<Option<Wallet>, AppError> {
    let wallet = sqlx::query_as::<_, Wallet>(
        "SELECT id, balance, created_at FROM wallets WHERE id = $1 FOR UPDATE",
    )
    .bind(wallet_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(wallet)
}

/// Persist a new balance for a wallet locked by `lock_wallet` in the same transaction.
pub async fn store_balance(
    tx: &mut Transaction<'_, Postgres>,
    wallet_id: Uuid,
    balance: i64,
) -> Result<Wallet, AppError> {
    let wallet = sqlx::query_as::<_, Wallet>(
        r#"
        UPDATE wallets
        SET balance = $1
        WHERE id = $2
        RETURNING id, balance, created_at
        "#,
    )
    .bind(balance)
    .bind(wallet_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(wallet)
}

/// Insert a wallet with an initial balance.
///
/// Wallets are provisioned out of band; there is no HTTP endpoint for this.
pub async fn create_wallet(pool: &DbPool, balance: i64) -> Result<Wallet, AppError> {
    let wallet = sqlx::query_as::<_, Wallet>(
        r#"
        INSERT INTO wallets (balance)
        VALUES ($1)
        RETURNING id, balance, created_at
        "#,
    )
    .bind(balance)
    .fetch_one(pool)
    .await?;

    Ok(wallet)
}
