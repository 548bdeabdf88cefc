//! API Integration Tests

use axum::{body::Body, http::StatusCode};
use serde_json::json;

use orzu_gateway::domain::CreditStatus;
use orzu_gateway::gateway::FakeGateway;
use orzu_gateway::store::InMemoryClientStore;

mod common;

use common::{body_json, get, post_json, post_json_with, profile, setup_app};

fn tranche_body(orzu_id: i64) -> serde_json::Value {
    json!({
        "terminal_id": 17,
        "pOrzuId": orzu_id,
        "pan": "4890844032435600",
        "pSum": 1500.5,
        "pCredConditions": 3,
        "pRecipient": "992900000001"
    })
}

// =========================================================================
// Service authentication
// =========================================================================

#[tokio::test]
async fn test_service_token_required() {
    let app = setup_app(FakeGateway::new(), InMemoryClientStore::new());

    let req = axum::http::Request::builder()
        .uri("/ping")
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error_code"], "missing_service_token");

    let req = axum::http::Request::builder()
        .uri("/ping")
        .header("Authorization", "wrong")
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.send(get("/ping").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["code"], 200);
}

// =========================================================================
// Session authentication
// =========================================================================

#[tokio::test]
async fn test_business_routes_require_session() {
    let app = setup_app(FakeGateway::new(), InMemoryClientStore::new());

    let response = app
        .send(get("/business/services").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error_code"], "missing_session");

    let response = app
        .send(
            get("/business/services")
                .header("token", "not-bearer")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_confirmed_otp_opens_business_routes() {
    let app = setup_app(FakeGateway::new(), InMemoryClientStore::new());

    let response = app
        .send(post_json(
            "/otp/confirm-otp",
            &json!({"id": "otp-1", "account": "+992915501234", "value": "1234"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .send(
            get("/business/services")
                .header("token", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// =========================================================================
// OTP
// =========================================================================

#[tokio::test]
async fn test_send_otp_phone_normalization() {
    let app = setup_app(FakeGateway::new(), InMemoryClientStore::new());

    let response = app
        .send(post_json("/otp/send", &json!({"account": "915501234"})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.gateway.sent_otps()[0].account, "+992915501234");

    let response = app
        .send(post_json("/otp/send", &json!({"account": "12345"})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_code"], "invalid_phone");
    assert_eq!(app.gateway.sent_otps().len(), 1);
}

// =========================================================================
// Tranche
// =========================================================================

#[tokio::test]
async fn test_tranche_e2e_from_lookup() {
    let app = setup_app(
        FakeGateway::new()
            .with_profile("020304050", profile(9995))
            .with_transaction_id(555),
        InMemoryClientStore::new(),
    );

    // 1. Lookup caches the profile
    let response = app
        .send(get("/user/020304050").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["payload"]["orzu_id"], 9995);

    // 2. First tranche persists the client and links the transaction
    let session = app.session_header();
    let response = app
        .send(post_json_with("/business/transh", &tranche_body(9995), Some(&session)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["code"], 200);
    assert_eq!(body["payload"], 555);

    let clients = app.store.clients().await;
    assert_eq!(clients.len(), 1);

    let credits = app.store.credits().await;
    assert_eq!(credits.len(), 1);
    assert_eq!(credits[0].client_id, clients[0].id);
    assert_eq!(credits[0].status, CreditStatus::Created);
    assert_eq!(credits[0].transaction_id, Some(555));
}

#[tokio::test]
async fn test_tranche_unknown_client() {
    let app = setup_app(FakeGateway::new(), InMemoryClientStore::new());
    let session = app.session_header();

    let response = app
        .send(post_json_with("/business/transh", &tranche_body(4242), Some(&session)))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error_code"], "client_not_resolved");

    assert!(app.store.credits().await.is_empty());
    assert!(app.gateway.tranche_requests().is_empty());
}

#[tokio::test]
async fn test_tranche_gateway_rejection() {
    let app = setup_app(
        FakeGateway::new().rejecting_tranches(400, "limit exceeded"),
        InMemoryClientStore::new().with_client(&profile(9995)).await,
    );
    let session = app.session_header();

    let response = app
        .send(post_json_with("/business/transh", &tranche_body(9995), Some(&session)))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = body_json(response).await;
    assert_eq!(body["error_code"], "gateway_error");
    assert!(body["details"].as_str().unwrap().contains("limit exceeded"));

    let credits = app.store.credits().await;
    assert!(credits[0].is_unlinked());
}

#[tokio::test]
async fn test_tranche_invalid_sum_is_bad_request() {
    let app = setup_app(
        FakeGateway::new(),
        InMemoryClientStore::new().with_client(&profile(9995)).await,
    );
    let session = app.session_header();

    for sum in [json!(0), json!(-10), json!(12.345)] {
        let mut body = tranche_body(9995);
        body["pSum"] = sum.clone();

        let response = app
            .send(post_json_with("/business/transh", &body, Some(&session)))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "pSum {}", sum);

        let body = body_json(response).await;
        assert_eq!(body["error_code"], "invalid_amount");
        assert!(body["details"].is_string());
    }

    assert!(app.store.credits().await.is_empty());
    assert!(app.gateway.tranche_requests().is_empty());
}

#[tokio::test]
async fn test_tranche_malformed_body_is_bad_request() {
    let app = setup_app(
        FakeGateway::new(),
        InMemoryClientStore::new().with_client(&profile(9995)).await,
    );
    let session = app.session_header();

    let mut body = tranche_body(9995);
    body["pOrzuId"] = json!("abc");

    let response = app
        .send(post_json_with("/business/transh", &body, Some(&session)))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error_code"], "invalid_request");
    assert!(body["details"].as_str().unwrap().contains("pOrzuId"));
    assert!(app.store.credits().await.is_empty());
}

#[tokio::test]
async fn test_otp_body_without_account_is_bad_request() {
    let app = setup_app(FakeGateway::new(), InMemoryClientStore::new());

    let response = app.send(post_json("/otp/send", &json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_code"], "invalid_request");
    assert!(app.gateway.sent_otps().is_empty());
}

// =========================================================================
// Catalog
// =========================================================================

#[tokio::test]
async fn test_conditions_reject_non_numeric_ids() {
    let app = setup_app(FakeGateway::new(), InMemoryClientStore::new());
    let session = app.session_header();

    let response = app
        .send(
            get("/business/conditions?service_id=abc&orzu_id=9995")
                .header("token", session.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_code"], "invalid_identifier");
}

#[tokio::test]
async fn test_check_pan() {
    let app = setup_app(FakeGateway::new(), InMemoryClientStore::new());

    let response = app
        .send(
            get("/user/check-pan?orzu_id=9995&pan=4890844032435600")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["eligible"], true);
}
