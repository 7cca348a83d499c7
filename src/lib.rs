//! Wallet balance service.
//!
//! Callers deposit to or withdraw from a wallet identified by a UUID and query its
//! balance. Concurrent mutations of one wallet are serialized with a PostgreSQL row
//! lock, so the balance never goes negative and no update is lost.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Format**: JSON requests/responses

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod services;
