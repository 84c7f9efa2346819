//! # Visitor Tests

mod common;

use axum::http::StatusCode;
use common::Fixture;
use serde_json::json;

async fn register(fx: &Fixture, phone: &str, name: &str) -> String {
    let (status, body) = fx
        .app
        .post(
            "/api/visitors",
            &fx.token(&fx.acme_employee),
            json!({"phone": phone, "full_name": name, "organization": "Rao Textiles", "interests": "Warm"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_visitor_and_conflict() {
    let fx = Fixture::new().await;
    let id = register(&fx, "9998887771", "Asha Rao").await;

    let (status, body) = fx
        .app
        .post(
            "/api/visitors",
            &fx.token(&fx.globex_employee),
            json!({"phone": " 9998887771 ", "full_name": "Other"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Visitor with this phone number already exists");
    assert_eq!(body["visitor_id"], id);

    let (status, body) = fx
        .app
        .post(
            "/api/visitors",
            &fx.token(&fx.acme_employee),
            json!({"phone": "1234567"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "full_name");
}

#[tokio::test]
async fn test_search_by_phone() {
    let fx = Fixture::new().await;
    register(&fx, "9998887771", "Asha Rao").await;
    register(&fx, "9998880000", "Vik Das").await;
    register(&fx, "5550001111", "Lee Park").await;
    let token = fx.token(&fx.acme_employee);

    let (status, body) = fx.app.get("/api/visitors/search/99", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Phone number must be at least 3 characters");

    let (status, body) = fx.app.get("/api/visitors/search/9998", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 2);

    let (_, body) = fx.app.get("/api/visitors/search/0001", &token).await;
    assert_eq!(body["data"]["visitors"][0]["full_name"], "Lee Park");
}

#[tokio::test]
async fn test_get_and_update_visitor() {
    let fx = Fixture::new().await;
    let id = register(&fx, "9998887771", "Asha Rao").await;
    let token = fx.token(&fx.acme_admin);
    let uri = format!("/api/visitors/{id}");

    let (status, body) = fx
        .app
        .put(&uri, &token, json!({"city": "Pune", "interests": "Hot"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["city"], "Pune");
    assert_eq!(body["data"]["interests"], "Hot");
    assert_eq!(body["data"]["organization"], "Rao Textiles");

    let (status, body) = fx.app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phone"], "9998887771");

    let (status, body) = fx
        .app
        .get(&format!("/api/visitors/{}", uuid::Uuid::new_v4()), &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Visitor not found");
}

#[tokio::test]
async fn test_list_and_stats_are_platform_only() {
    let fx = Fixture::new().await;
    register(&fx, "9998887771", "Asha Rao").await;
    register(&fx, "5550001111", "Lee Park").await;

    for uri in ["/api/visitors", "/api/visitors/stats/overview"] {
        let (status, _) = fx.app.get(uri, &fx.token(&fx.acme_admin)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let root = fx.token(&fx.platform_admin);
    let (status, body) = fx.app.get("/api/visitors?search=rao%20tex", &root).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total_records"], 2);

    let (_, body) = fx.app.get("/api/visitors?search=lee", &root).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = fx.app.get("/api/visitors/stats/overview", &root).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_visitors"], 2);
    assert_eq!(body["data"]["visitors_today"], 2);
}

#[tokio::test]
async fn test_delete_visitor_removes_leads() {
    let fx = Fixture::new().await;
    let (status, created) = fx
        .app
        .post(
            "/api/leads",
            &fx.token(&fx.acme_employee),
            json!({"phone": "9998887771", "full_name": "Asha Rao"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let visitor_id = created["data"]["visitor"]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/visitors/{visitor_id}");
    let (status, _) = fx.app.delete(&uri, &fx.token(&fx.acme_admin)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let root = fx.token(&fx.platform_admin);
    let (status, _) = fx.app.delete(&uri, &root).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = fx.app.get("/api/leads", &root).await;
    assert_eq!(body["pagination"]["total_records"], 0);
    let (status, _) = fx.app.get(&uri, &root).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
