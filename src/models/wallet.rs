//! Wallet data models and API request/response types.
//!
//! This module defines:
//! - `Wallet`: Database entity representing a wallet
//! - `OperationType` / `WalletOperationRequest`: Request body for balance mutations
//! - `WalletResponse`: Response body returned to clients

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

/// Represents a wallet record from the database.
///
/// # Database Table
///
/// Maps to the `wallets` table. Balances are stored as `i64` in the smallest
/// currency unit. The row is the unit of locking: every deposit and withdrawal
/// holds `FOR UPDATE` on it for the whole read-modify-write.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Wallet {
    /// Unique identifier for this wallet
    pub id: Uuid,

    /// Current balance in the smallest currency unit
    ///
    /// Must be >= 0 (enforced by the engine and by a database CHECK constraint).
    pub balance: i64,

    /// Timestamp when the wallet was created
    pub created_at: DateTime<Utc>,
}

/// Kind of balance mutation requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    Deposit,
    Withdraw,
}

/// Request body for `POST /api/v1/wallets/{wallet_uuid}/operation`.
///
/// # JSON Example
///
/// ```json
/// {
///   "operation_type": "DEPOSIT",
///   "amount": 1000
/// }
/// ```
///
/// # Validation
///
/// - `operation_type`: Required, `DEPOSIT` or `WITHDRAW`
/// - `amount`: Required, integer >= 1; an integer written as a string (`"1000"`) is accepted
#[derive(Debug, Deserialize)]
pub struct WalletOperationRequest {
    pub operation_type: OperationType,

    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: i64,
}

impl WalletOperationRequest {
    /// Check constraints serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.amount < 1 {
            return Err("amount must be greater than or equal to 1".to_string());
        }
        Ok(())
    }
}

/// Accept `100` as well as `"100"`.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(AmountVisitor)
}

struct AmountVisitor;

impl<'de> de::Visitor<'de> for AmountVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer amount")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
        i64::try_from(value)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
        value
            .trim()
            .parse::<i64>()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

/// Response body for wallet endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "wallet_uuid": "550e8400-e29b-41d4-a716-446655440000",
///   "balance": 1500
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletResponse {
    pub wallet_uuid: Uuid,
    pub balance: i64,
}

impl From<Wallet> for WalletResponse {
    fn from(wallet: Wallet) -> Self {
        Self {
            wallet_uuid: wallet.id,
            balance: wallet.balance,
        }
    }
}
