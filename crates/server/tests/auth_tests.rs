//! # Authentication Flow Tests

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::{Fixture, TestApp, TEST_PASSWORD};
use entity::sea_orm_active_enums::UserRole;
use serde_json::json;

#[tokio::test]
async fn test_health_reports_ok() {
    let app = TestApp::new().await;
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert!(body["data"]["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new().await;
    let response = app
        .send(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-1234567890")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.headers()["x-request-id"], "req-1234567890");
}

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "RAVI@acme.test", "password": TEST_PASSWORD})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["data"]["user"]["role"], "employee");
    assert_eq!(body["data"]["user"]["company_name"], "Acme Expo");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let token = body["data"]["token"].as_str().unwrap();
    let (status, profile) = fx.app.get("/api/auth/profile", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["data"]["user"]["email"], "ravi@acme.test");
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "ravi@acme.test", "password": "nope-nope"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_missing_and_garbage_tokens() {
    let app = TestApp::new().await;
    let (status, body) = app.call(Method::GET, "/api/leads", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Access token required");

    let (status, _) = app.get("/api/leads", "not.a.jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deactivated_user_fails_login_and_token() {
    let fx = Fixture::new().await;
    let employee_token = fx.token(&fx.acme_employee);
    let root = fx.token(&fx.platform_admin);

    let (status, _) = fx
        .app
        .put(
            &format!("/api/admin/users/{}/deactivate", fx.acme_employee.id),
            &root,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = fx.app.get("/api/leads", &employee_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token or user not found");

    let (status, _) = fx
        .app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "ravi@acme.test", "password": TEST_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_requires_platform_admin_and_company() {
    let fx = Fixture::new().await;
    let root = fx.token(&fx.platform_admin);

    let (status, _) = fx
        .app
        .post(
            "/api/auth/register",
            &fx.token(&fx.acme_admin),
            json!({"email": "x@acme.test", "password": "secret1", "full_name": "Xavier", "role": "employee"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = fx
        .app
        .post(
            "/api/auth/register",
            &root,
            json!({"email": "x@acme.test", "password": "secret1", "full_name": "Xavier", "role": "employee"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = fx
        .app
        .post(
            "/api/auth/register",
            &root,
            json!({
                "email": "x@acme.test", "password": "secret1", "full_name": "Xavier",
                "role": "employee", "company_id": uuid::Uuid::new_v4(),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({
        "email": "x@acme.test", "password": "secret1", "full_name": "Xavier",
        "role": "employee", "company_id": fx.acme.id,
    });
    let (status, created) = fx.app.post("/api/auth/register", &root, body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["company_id"], fx.acme.id.to_string());

    let (status, _) = fx.app.post("/api/auth/register", &root, body).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation_details() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .app
        .post(
            "/api/auth/register",
            &fx.token(&fx.platform_admin),
            json!({"email": "bad", "password": "1", "full_name": "Xavier", "role": "platform_admin"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn test_profile_update_and_change_password() {
    let fx = Fixture::new().await;
    let token = fx.token(&fx.acme_employee);

    let (status, body) = fx
        .app
        .put(
            "/api/auth/profile",
            &token,
            json!({"full_name": "Ravi Kumar", "phone": "9000000001"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["full_name"], "Ravi Kumar");
    assert_eq!(body["data"]["user"]["phone"], "9000000001");

    let (status, body) = fx
        .app
        .put(
            "/api/auth/change-password",
            &token,
            json!({"current_password": "wrong-password", "new_password": "brand-new-1"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Current password is incorrect");

    let (status, _) = fx
        .app
        .put(
            "/api/auth/change-password",
            &token,
            json!({"current_password": TEST_PASSWORD, "new_password": "brand-new-1"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = fx
        .app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "ravi@acme.test", "password": "brand-new-1"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_platform_admin_profile_has_no_company() {
    let app = TestApp::new().await;
    let root = app.user("solo@expo.test", UserRole::PlatformAdmin, None).await;
    let (status, body) = app.get("/api/auth/profile", &app.token(&root)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["user"]["company_id"].is_null());
}
