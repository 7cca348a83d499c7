mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tokio::task::JoinSet;
use tower::ServiceExt;
use uuid::Uuid;
use wallet_service::{app, services::wallet_store};

use common::{lazy_pool, setup_test_db};

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn operation(wallet: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/v1/wallets/{wallet}/operation"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn ping_does_not_need_database() {
    let (status, body) = send(app::router(lazy_pool()), get("/ping")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK", "message": "Pong"}));
}

#[tokio::test]
async fn malformed_wallet_uuid_is_unprocessable() {
    let (status, body) = send(app::router(lazy_pool()), get("/api/v1/wallets/not-a-uuid")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, _) = send(
        app::router(lazy_pool()),
        operation("not-a-uuid", json!({"operation_type": "DEPOSIT", "amount": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn invalid_operation_bodies_are_unprocessable() {
    let wallet = Uuid::new_v4().to_string();
    let bodies = [
        json!({"operation_type": "INVALID", "amount": 100}),
        json!({"operation_type": "DEPOSIT", "amount": -100}),
        json!({"operation_type": "DEPOSIT", "amount": 0}),
        json!({"operation_type": "WITHDRAW", "amount": "abc"}),
        json!({"amount": 100}),
        json!({"operation_type": "DEPOSIT"}),
    ];

    for body in bodies {
        let (status, response) = send(app::router(lazy_pool()), operation(&wallet, body.clone())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {body}");
        assert_eq!(response["error"]["code"], "validation_error", "body: {body}");
    }
}

#[tokio::test]
async fn fractional_amount_error_does_not_leak_internal_types() {
    let (status, body) = send(
        app::router(lazy_pool()),
        operation(
            &Uuid::new_v4().to_string(),
            json!({"operation_type": "DEPOSIT", "amount": 1.5}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("expected an integer amount"), "{message}");
    assert!(!message.contains("RawAmount"), "{message}");
    assert!(!message.contains("untagged"), "{message}");
}

#[test]
#[should_panic(expected = "REQUIRE_DB")]
fn missing_database_fails_when_required() {
    common::database_unavailable("DATABASE_URL not set", true);
}

#[test]
fn missing_database_skips_when_optional() {
    common::database_unavailable("DATABASE_URL not set", false);
}

#[tokio::test]
async fn non_json_body_is_unprocessable() {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/wallets/{}/operation", Uuid::new_v4()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(app::router(lazy_pool()), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn balance_and_operations_round_trip_over_http() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let wallet = wallet_store::create_wallet(&pool, 1000).await.unwrap();
    let id = wallet.id.to_string();
    let app = app::router(pool);

    let (status, body) = send(app.clone(), get(&format!("/api/v1/wallets/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"wallet_uuid": id, "balance": 1000}));

    let (status, body) = send(
        app.clone(),
        operation(&id, json!({"operation_type": "DEPOSIT", "amount": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"wallet_uuid": id, "balance": 1500}));

    let (status, body) = send(
        app.clone(),
        operation(&id, json!({"operation_type": "WITHDRAW", "amount": 300})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 1200);

    let (status, body) = send(
        app.clone(),
        operation(&id, json!({"operation_type": "WITHDRAW", "amount": 2000})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "insufficient_funds");
    assert_eq!(body["error"]["message"], "Insufficient funds");

    let (_, body) = send(app, get(&format!("/api/v1/wallets/{id}"))).await;
    assert_eq!(body["balance"], 1200);
}

#[tokio::test]
async fn withdrawing_whole_balance_over_http() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let wallet = wallet_store::create_wallet(&pool, 1000).await.unwrap();
    let id = wallet.id.to_string();

    let (status, body) = send(
        app::router(pool),
        operation(&id, json!({"operation_type": "WITHDRAW", "amount": 1000})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"wallet_uuid": id, "balance": 0}));
}

#[tokio::test]
async fn string_amount_is_accepted() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let wallet = wallet_store::create_wallet(&pool, 1000).await.unwrap();

    let (status, body) = send(
        app::router(pool),
        operation(
            &wallet.id.to_string(),
            json!({"operation_type": "DEPOSIT", "amount": "100"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 1100);
}

#[tokio::test]
async fn unknown_wallet_is_not_found_over_http() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let app = app::router(pool);
    let missing = Uuid::new_v4().to_string();

    let (status, body) = send(app.clone(), get(&format!("/api/v1/wallets/{missing}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "wallet_not_found");
    assert_eq!(body["error"]["message"], "Wallet not found");

    for operation_type in ["DEPOSIT", "WITHDRAW"] {
        let (status, _) = send(
            app.clone(),
            operation(&missing, json!({"operation_type": operation_type, "amount": 100})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn concurrent_http_deposits_add_up() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let wallet = wallet_store::create_wallet(&pool, 0).await.unwrap();
    let id = wallet.id.to_string();
    let app = app::router(pool);

    let mut requests = JoinSet::new();
    for _ in 0..50 {
        let app = app.clone();
        let id = id.clone();
        requests.spawn(async move {
            send(app, operation(&id, json!({"operation_type": "DEPOSIT", "amount": 1}))).await
        });
    }
    while let Some(result) = requests.join_next().await {
        let (status, _) = result.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(app, get(&format!("/api/v1/wallets/{id}"))).await;
    assert_eq!(body["balance"], 50);
}

#[tokio::test]
async fn health_reports_connected_database() {
    let Some(pool) = setup_test_db().await else {
        return;
    };

    let (status, body) = send(app::router(pool), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
