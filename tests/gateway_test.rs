use std::{sync::Arc, time::Duration};

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use depined_pinger::{
    account::Account,
    api::{DepinedClient, Ident, RewardsApi},
    error::ApiError,
    http::ClientPool,
};
use serde_json::{json, Value};

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn user_details(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some("good") => Json(json!({
            "code": 200,
            "data": {
                "email": "me@example.com",
                "verified": false,
                "current_tier": 2,
                "points_balance": 99.5
            }
        }))
        .into_response(),
        Some("garbled") => "<html>maintenance</html>".into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn referral_stats() -> Json<Value> {
    Json(json!({ "code": 200, "data": { "total_unclaimed_points": 5.5 } }))
}

async fn epoch_earnings() -> Json<Value> {
    Json(json!({ "code": 200, "data": null }))
}

async fn widget_connect(Json(body): Json<Value>) -> Json<Value> {
    match body["connected"].as_bool() {
        Some(true) => Json(json!({ "code": 200, "message": "connected" })),
        _ => Json(json!({ "code": 400, "message": "bad payload" })),
    }
}

async fn claim_points() -> StatusCode {
    StatusCode::TOO_MANY_REQUESTS
}

async fn login(Json(body): Json<Value>) -> Response {
    match (body["email"].as_str(), body["password"].as_str()) {
        (Some("me@example.com"), Some("secret")) => Json(json!({
            "message": "ok",
            "data": { "token": "fresh-token" }
        }))
        .into_response(),
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn confirm_referral(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "message": "confirmed",
        "data": { "token": bearer(&headers), "code": body["referral_code"] }
    }))
}

async fn profile_creation() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database down")
}

async fn spawn_server() -> String {
    let router = Router::new()
        .route("/api/user/details", get(user_details))
        .route("/api/referrals/stats", get(referral_stats))
        .route("/api/stats/epoch-earnings", get(epoch_earnings))
        .route("/api/user/widget-connect", post(widget_connect))
        .route("/api/referrals/claim_points", post(claim_points))
        .route("/api/user/login", post(login))
        .route("/api/access-code/referal", post(confirm_referral))
        .route("/api/user/profile-creation", post(profile_creation));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    format!("http://{addr}/")
}

async fn client() -> DepinedClient {
    let base_url = spawn_server().await;
    DepinedClient::new(base_url, Arc::new(ClientPool::new(Duration::from_secs(5))))
}

fn account(token: &str, proxy: Option<&str>) -> Account {
    Account {
        token: token.to_string(),
        index: 0,
        proxy: proxy.map(str::to_string),
    }
}

#[tokio::test]
async fn test_user_info_is_parsed() {
    let client = client().await;

    let profile = client.fetch_user_info(&account("good", None)).await.unwrap();

    assert_eq!(profile.email, "me@example.com");
    assert_eq!(profile.current_tier, Some(Ident::Number(2)));
    assert_eq!(profile.points_balance, 99.5);
    assert!(!profile.verified);
}

#[tokio::test]
async fn test_bad_token_is_unauthorized() {
    let client = client().await;

    let err = client
        .fetch_user_info(&account("expired", None))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized(401)));
}

#[tokio::test]
async fn test_non_json_body_is_a_parse_error() {
    let client = client().await;

    let err = client
        .fetch_user_info(&account("garbled", None))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn test_unsupported_proxy_falls_back_to_direct() {
    let client = client().await;

    let result = client
        .fetch_user_info(&account("good", Some("ftp://proxy.invalid:21")))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_referral_stats_and_missing_earnings() {
    let client = client().await;
    let acc = account("good", None);

    let stats = client.fetch_referral_stats(&acc).await.unwrap();
    assert_eq!(stats.total_unclaimed_points, 5.5);

    let err = client.fetch_earnings(&acc).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingData));
}

#[tokio::test]
async fn test_heartbeat_sends_connected_flag() {
    let client = client().await;

    let reply = client
        .send_connect_heartbeat(&account("good", None))
        .await
        .unwrap();

    assert_eq!(reply.code, 200);
    assert_eq!(reply.message, "connected");
}

#[tokio::test]
async fn test_rate_limited_claim() {
    let client = client().await;

    let err = client
        .claim_referral_points(&account("good", None))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::RateLimited));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_login_and_confirm_referral() {
    let client = client().await;

    let login = client.login("me@example.com", "secret").await.unwrap();
    assert_eq!(login.token, "fresh-token");

    let confirmed = client
        .confirm_referral(&login.token, "REF42")
        .await
        .unwrap();
    let data = confirmed.data.unwrap();
    assert_eq!(data["token"], "fresh-token");
    assert_eq!(data["code"], "REF42");

    assert!(client.login("me@example.com", "wrong").await.is_err());
}

#[tokio::test]
async fn test_server_error_carries_body() {
    let client = client().await;

    let err = client
        .create_profile("fresh-token", &json!({ "username": "me" }))
        .await
        .unwrap_err();

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "database down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_service_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = DepinedClient::new(
        format!("http://{addr}"),
        Arc::new(ClientPool::new(Duration::from_secs(5))),
    );

    let err = client
        .fetch_referral_stats(&account("good", None))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
}
