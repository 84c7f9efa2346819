//! # Lead Capture and Scoping Tests

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{body_bytes, Fixture};
use entity::visitor_leads;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{json, Value};

async fn capture(fx: &Fixture, token: &str, phone: &str, name: &str) -> Value {
    let (status, body) = fx
        .app
        .post(
            "/api/leads",
            token,
            json!({"phone": phone, "full_name": name, "organization": "Rao Textiles", "interests": "Hot"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

fn ids(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_employee_capture_binds_company_and_employee() {
    let fx = Fixture::new().await;
    let token = fx.token(&fx.acme_employee);

    let (status, body) = fx
        .app
        .post(
            "/api/leads",
            &token,
            json!({
                "phone": "9998887771",
                "full_name": "Asha Rao",
                "company_id": fx.globex.id,
                "follow_up_date": "",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let lead = &body["data"]["lead"];
    assert_eq!(lead["company_id"], fx.acme.id.to_string());
    assert_eq!(lead["employee_id"], fx.acme_employee.id.to_string());
    assert!(lead["follow_up_date"].is_null());
    assert_eq!(body["data"]["visitor"]["phone"], "9998887771");
    assert_eq!(body["data"]["visitor"]["full_name"], "Asha Rao");
}

#[tokio::test]
async fn test_same_day_duplicate_returns_existing_lead() {
    let fx = Fixture::new().await;
    let token = fx.token(&fx.acme_employee);
    let first = capture(&fx, &token, "9998887771", "Asha Rao").await;

    let (status, body) = fx
        .app
        .post(
            "/api/leads",
            &fx.token(&fx.acme_employee2),
            json!({"phone": "9998887771", "full_name": "Asha Rao"}),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Lead already exists for this visitor today");
    assert_eq!(body["existing_lead_id"], first["lead"]["id"]);
    assert_eq!(
        visitor_leads::Entity::find()
            .count(&fx.app.state.db)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_same_visitor_other_company_is_allowed() {
    let fx = Fixture::new().await;
    let acme = capture(&fx, &fx.token(&fx.acme_employee), "9998887771", "Asha Rao").await;
    let globex = capture(&fx, &fx.token(&fx.globex_employee), "9998887771", "Someone Else").await;

    assert_eq!(acme["visitor"]["id"], globex["visitor"]["id"]);
    assert_eq!(globex["visitor"]["full_name"], "Asha Rao");
    assert_ne!(acme["lead"]["id"], globex["lead"]["id"]);
}

#[tokio::test]
async fn test_capture_by_visitor_id_snapshots_visitor() {
    let fx = Fixture::new().await;
    let root = fx.token(&fx.platform_admin);
    let (status, visitor) = fx
        .app
        .post(
            "/api/visitors",
            &root,
            json!({"phone": "5551112222", "full_name": "Lin Chen", "city": "Taipei"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = fx
        .app
        .post(
            "/api/leads",
            &fx.token(&fx.acme_employee),
            json!({"visitor_id": visitor["data"]["id"], "city": "Ignored", "country": "Taiwan", "notes": "booth 4"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["lead"]["city"], "Taipei");
    assert_eq!(body["data"]["lead"]["country"], "Taiwan");
    assert_eq!(body["data"]["lead"]["notes"], "booth 4");
}

#[tokio::test]
async fn test_capture_errors() {
    let fx = Fixture::new().await;

    let (status, body) = fx
        .app
        .post(
            "/api/leads",
            &fx.token(&fx.platform_admin),
            json!({"phone": "9998887771", "full_name": "Asha Rao"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Company ID required for platform admin");

    let employee = fx.token(&fx.acme_employee);
    let (status, body) = fx
        .app
        .post(
            "/api/leads",
            &employee,
            json!({"visitor_id": uuid::Uuid::new_v4()}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Visitor not found");

    let (status, _) = fx
        .app
        .post("/api/leads", &employee, json!({"phone": "9998887771"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = fx
        .app
        .post(
            "/api/leads",
            &employee,
            json!({"phone": "9998887771", "full_name": "Asha", "interests": "Lukewarm"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_platform_admin_capture_for_company() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .app
        .post(
            "/api/leads",
            &fx.token(&fx.platform_admin),
            json!({"phone": "9998887771", "full_name": "Asha Rao", "company_id": fx.globex.id}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["lead"]["company_id"], fx.globex.id.to_string());
}

#[tokio::test]
async fn test_list_scoping_by_role() {
    let fx = Fixture::new().await;
    let mine = capture(&fx, &fx.token(&fx.acme_employee), "1110000001", "One").await;
    let colleague = capture(&fx, &fx.token(&fx.acme_employee2), "1110000002", "Two").await;
    let foreign = capture(&fx, &fx.token(&fx.globex_employee), "1110000003", "Three").await;
    let id = |lead: &Value| lead["lead"]["id"].as_str().unwrap().to_string();

    let (_, body) = fx
        .app
        .get(
            &format!("/api/leads?employee_id={}", fx.acme_employee2.id),
            &fx.token(&fx.acme_employee),
        )
        .await;
    assert_eq!(ids(&body), vec![id(&mine)]);
    assert_eq!(body["data"][0]["employee_name"], "ravi");
    assert_eq!(body["data"][0]["visitor_phone"], "1110000001");
    assert_eq!(body["data"][0]["company_name"], "Acme Expo");

    let (_, body) = fx
        .app
        .get(
            &format!("/api/leads?company_id={}", fx.globex.id),
            &fx.token(&fx.acme_admin),
        )
        .await;
    let acme_ids = ids(&body);
    assert_eq!(acme_ids.len(), 2);
    assert!(acme_ids.contains(&id(&mine)));
    assert!(acme_ids.contains(&id(&colleague)));
    assert!(!acme_ids.contains(&id(&foreign)));
    assert_eq!(body["pagination"]["total_records"], 2);

    let (_, body) = fx
        .app
        .get(
            &format!("/api/leads?company_id={}", fx.globex.id),
            &fx.token(&fx.platform_admin),
        )
        .await;
    assert_eq!(ids(&body), vec![id(&foreign)]);

    let (_, body) = fx
        .app
        .get("/api/leads?limit=1&page=2", &fx.token(&fx.platform_admin))
        .await;
    assert_eq!(ids(&body).len(), 1);
    assert_eq!(body["pagination"]["current_page"], 2);
    assert_eq!(body["pagination"]["total_pages"], 3);
    assert_eq!(body["pagination"]["has_prev"], true);
}

#[tokio::test]
async fn test_list_search_and_date_filters() {
    let fx = Fixture::new().await;
    let token = fx.token(&fx.acme_admin);
    capture(&fx, &fx.token(&fx.acme_employee), "1110000001", "Asha Rao").await;
    capture(&fx, &fx.token(&fx.acme_employee), "2220000002", "Bilal Khan").await;

    let (_, body) = fx.app.get("/api/leads?search=ASHA", &token).await;
    assert_eq!(ids(&body).len(), 1);
    assert_eq!(body["data"][0]["visitor_name"], "Asha Rao");

    let (_, body) = fx.app.get("/api/leads?search=%25", &token).await;
    assert_eq!(ids(&body).len(), 0);

    let (_, body) = fx.app.get("/api/leads?date_from=2000-01-01&date_to=2000-12-31", &token).await;
    assert_eq!(ids(&body).len(), 0);

    let (status, _) = fx.app.get("/api/leads?date_from=yesterday", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_lead_scoping() {
    let fx = Fixture::new().await;
    let lead = capture(&fx, &fx.token(&fx.acme_employee), "9998887771", "Asha Rao").await;
    let uri = format!("/api/leads/{}", lead["lead"]["id"].as_str().unwrap());

    let (status, body) = fx.app.get(&uri, &fx.token(&fx.acme_admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["visitor_name"], "Asha Rao");

    for user in [&fx.acme_employee2, &fx.globex_admin] {
        let (status, body) = fx.app.get(&uri, &fx.token(user)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Lead not found or access denied");
    }
}

#[tokio::test]
async fn test_update_only_touches_writable_fields() {
    let fx = Fixture::new().await;
    let lead = capture(&fx, &fx.token(&fx.acme_employee), "9998887771", "Asha Rao").await;
    let uri = format!("/api/leads/{}", lead["lead"]["id"].as_str().unwrap());

    let (status, body) = fx
        .app
        .put(
            &uri,
            &fx.token(&fx.acme_employee),
            json!({
                "notes": "send brochure",
                "follow_up_date": "2030-01-15",
                "company_id": fx.globex.id,
                "employee_id": fx.acme_employee2.id,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notes"], "send brochure");
    assert_eq!(body["data"]["follow_up_date"], "2030-01-15");
    assert_eq!(body["data"]["interests"], "Hot");
    assert_eq!(body["data"]["company_id"], fx.acme.id.to_string());
    assert_eq!(body["data"]["employee_id"], fx.acme_employee.id.to_string());
}

#[tokio::test]
async fn test_update_permissions() {
    let fx = Fixture::new().await;
    let lead = capture(&fx, &fx.token(&fx.acme_employee), "9998887771", "Asha Rao").await;
    let uri = format!("/api/leads/{}", lead["lead"]["id"].as_str().unwrap());

    let (status, body) = fx.app.put(&uri, &fx.token(&fx.acme_employee2), json!({"notes": "x"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Can only update your own leads");

    let (status, body) = fx.app.put(&uri, &fx.token(&fx.globex_admin), json!({"notes": "x"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied");

    let (status, _) = fx.app.put(&uri, &fx.token(&fx.acme_admin), json!({"interests": "Cold"})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = fx
        .app
        .put(
            &format!("/api/leads/{}", uuid::Uuid::new_v4()),
            &fx.token(&fx.acme_admin),
            json!({"notes": "x"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_permissions() {
    let fx = Fixture::new().await;
    let lead = capture(&fx, &fx.token(&fx.acme_employee), "9998887771", "Asha Rao").await;
    let uri = format!("/api/leads/{}", lead["lead"]["id"].as_str().unwrap());

    let (status, _) = fx.app.delete(&uri, &fx.token(&fx.acme_employee)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = fx.app.delete(&uri, &fx.token(&fx.globex_admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = fx.app.delete(&uri, &fx.token(&fx.acme_admin)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = fx.app.delete(&uri, &fx.token(&fx.platform_admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_follow_scope() {
    let fx = Fixture::new().await;
    let token = fx.token(&fx.acme_employee);
    let lead = capture(&fx, &token, "1110000001", "One").await;
    capture(&fx, &fx.token(&fx.acme_employee2), "1110000002", "Two").await;
    capture(&fx, &fx.token(&fx.globex_employee), "1110000003", "Three").await;

    fx.app
        .put(
            &format!("/api/leads/{}", lead["lead"]["id"].as_str().unwrap()),
            &token,
            json!({"follow_up_date": "2099-01-01"}),
        )
        .await;

    let (_, body) = fx.app.get("/api/leads/stats/overview", &token).await;
    assert_eq!(body["data"]["total_leads"], 1);
    assert_eq!(body["data"]["leads_today"], 1);
    assert_eq!(body["data"]["leads_with_follow_up"], 1);
    assert_eq!(body["data"]["pending_follow_ups"], 1);

    let (_, body) = fx.app.get("/api/leads/stats/overview", &fx.token(&fx.acme_admin)).await;
    assert_eq!(body["data"]["total_leads"], 2);
    assert_eq!(body["data"]["leads_last_7_days"], 2);

    let (_, body) = fx.app.get("/api/leads/stats/overview", &fx.token(&fx.platform_admin)).await;
    assert_eq!(body["data"]["total_leads"], 3);
}

#[tokio::test]
async fn test_csv_export() {
    let fx = Fixture::new().await;
    capture(&fx, &fx.token(&fx.acme_employee), "9998887771", "Asha Rao").await;
    capture(&fx, &fx.token(&fx.globex_employee), "5550009999", "Hidden").await;

    let response = fx
        .app
        .send(
            Request::builder()
                .uri("/api/leads/export/csv")
                .header(header::AUTHORIZATION, format!("Bearer {}", fx.token(&fx.acme_admin)))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("leads.csv"));

    let csv = String::from_utf8(body_bytes(response).await).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("lead_id,created_at,visitor_name"));
    assert!(lines[1].contains("Asha Rao"));
    assert!(lines[1].contains("Rao Textiles"));
    assert!(!csv.contains("Hidden"));
}
