//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables.

/// Wallet model and its request/response types
pub mod wallet;
