//! HTTP router construction.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{db::DbPool, handlers};

/// Build the application router.
///
/// # Routes
///
/// - `GET /ping` - liveness
/// - `GET /health` - readiness (checks the database)
/// - `GET /api/v1/wallets/{wallet_uuid}` - balance
/// - `POST /api/v1/wallets/{wallet_uuid}/operation` - deposit / withdraw
pub fn router(pool: DbPool) -> Router {
    let wallet_routes = Router::new()
        .route(
            "/api/v1/wallets/{wallet_uuid}",
            get(handlers::wallets::get_wallet),
        )
        .route(
            "/api/v1/wallets/{wallet_uuid}/operation",
            post(handlers::wallets::perform_operation),
        );

    Router::new()
        .route("/ping", get(handlers::health::ping))
        .route("/health", get(handlers::health::health_check))
        .merge(wallet_routes)
        // Request spans for every route
        .layer(TraceLayer::new_for_http())
        // Share database pool with all handlers via State extraction
        .with_state(pool)
}
