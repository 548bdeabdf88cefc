//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use orzu_gateway::api::{self, AppState};
use orzu_gateway::config::OtpConfig;
use orzu_gateway::domain::{ClientProfile, TrancheCredentials};
use orzu_gateway::gateway::FakeGateway;
use orzu_gateway::session::SessionTokens;
use orzu_gateway::store::{InMemoryClientStore, InMemoryProfileCache};

pub const SERVICE_TOKEN: &str = "service-token-123";
pub const JWT_SECRET: &str = "jwt-secret-123";

/// App wired to the fake gateway and in-memory store and cache
pub struct TestApp {
    pub router: Router,
    pub gateway: Arc<FakeGateway>,
    pub store: Arc<InMemoryClientStore>,
    pub cache: Arc<InMemoryProfileCache>,
    pub sessions: SessionTokens,
}

pub fn profile(orzu_id: i64) -> ClientProfile {
    ClientProfile {
        orzu_id,
        client_name: "Aziz Karimov".to_string(),
        set_date: "2023-01-10".to_string(),
        phone_number: "+992915501234".to_string(),
        passport_id: "A1234567".to_string(),
        passport_issue_date: "2019-05-01".to_string(),
    }
}

pub fn setup_app(gateway: FakeGateway, store: InMemoryClientStore) -> TestApp {
    let gateway = Arc::new(gateway);
    let store = Arc::new(store);
    let cache = Arc::new(InMemoryProfileCache::new());
    let sessions = SessionTokens::new(JWT_SECRET, Duration::from_secs(3000));

    let state = AppState {
        gateway: gateway.clone(),
        store: store.clone(),
        cache: cache.clone(),
        sessions: sessions.clone(),
        service_token: Arc::from(SERVICE_TOKEN),
        credentials: TrancheCredentials {
            secret_key: "secret".to_string(),
            service_id: "21".to_string(),
            token: "orzu-token".to_string(),
            phone_uuid: None,
        },
        otp: OtpConfig {
            url: "http://otp.test/otp".to_string(),
            lifetime: 120,
            confirm_limit: 3,
        },
        profile_cache_ttl: Duration::from_secs(3000),
    };

    TestApp {
        router: api::create_router(state),
        gateway,
        store,
        cache,
        sessions,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// `Bearer` header value for a fresh session
    pub fn session_header(&self) -> String {
        format!("Bearer {}", self.sessions.issue().unwrap())
    }
}

pub fn get(uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", SERVICE_TOKEN)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_json_with(uri, body, None)
}

pub fn post_json_with(uri: &str, body: &Value, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("Authorization", SERVICE_TOKEN);
    if let Some(session) = session {
        builder = builder.header("token", session);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
