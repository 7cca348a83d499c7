//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, row locking and balance validation.

pub mod wallet_service;
pub mod wallet_store;
