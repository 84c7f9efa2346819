//! # Common Test Utilities
//!
//! Provides shared test infrastructure: an in-memory database migrated from scratch, the full
//! application router, seeded companies and users, and request helpers.

#![allow(dead_code)]

use std::sync::{Once, OnceLock};

use auth::{secrecy::ExposeSecret, JwtConfig};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use base64::Engine;
use chrono::Utc;
use entity::{
    companies,
    sea_orm_active_enums::{CompanyStatus, UserRole},
    users,
};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, Set};
use serde_json::Value;
use server::{create_app_router, AppState, ServerSettings};
use tower::ServiceExt;
use uuid::Uuid;

/// Password of every seeded user
pub const TEST_PASSWORD: &str = "expo-pass-2026";

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Argon2 is slow in debug builds; hash the shared password once.
fn password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| {
        let secret = auth::secrecy::SecretString::from(TEST_PASSWORD.to_string());
        auth::hash_password(&secret, None)
            .expect("hash test password")
            .expose_secret()
            .to_string()
    })
}

pub fn jwt_config() -> JwtConfig {
    let mut config = JwtConfig::with_secret(
        base64::engine::general_purpose::STANDARD.encode("test-jwt-secret-for-integration-tests-32bytes-long!!"),
    );
    config.expiration_seconds = 3600;
    config
}

/// The application wired to a private in-memory database
pub struct TestApp {
    pub state:  AppState,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self { Self::with_settings(ServerSettings::default()).await }

    pub async fn with_settings(settings: ServerSettings) -> Self {
        init_test_env();
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("connect sqlite");
        Migrator::up(&db, None).await.expect("run migrations");

        let state = AppState::new(db, jwt_config(), settings);
        let router = create_app_router(state.clone());
        Self {
            state,
            router,
        }
    }

    pub async fn company(&self, name: &str, code: &str) -> companies::Model {
        let now = Utc::now();
        companies::ActiveModel {
            id:            Set(Uuid::new_v4()),
            name:          Set(name.to_string()),
            company_code:  Set(code.to_string()),
            contact_email: Set(None),
            contact_phone: Set(None),
            status:        Set(CompanyStatus::Active),
            created_at:    Set(now),
            updated_at:    Set(now),
        }
        .insert(&self.state.db)
        .await
        .expect("insert company")
    }

    pub async fn user(&self, email: &str, role: UserRole, company_id: Option<Uuid>) -> users::Model {
        let now = Utc::now();
        users::ActiveModel {
            id:            Set(Uuid::new_v4()),
            email:         Set(email.to_string()),
            password_hash: Set(password_hash().to_string()),
            full_name:     Set(email.split('@').next().unwrap_or(email).to_string()),
            phone:         Set(None),
            role:          Set(role),
            company_id:    Set(company_id),
            is_active:     Set(true),
            created_at:    Set(now),
            updated_at:    Set(now),
        }
        .insert(&self.state.db)
        .await
        .expect("insert user")
    }

    pub fn token(&self, user: &users::Model) -> String {
        let company_id = user.company_id.map(|id| id.to_string());
        auth::create_access_token(
            &self.state.jwt_config,
            &user.id.to_string(),
            &user.email,
            user.role.as_str(),
            company_id.as_deref(),
        )
        .expect("sign token")
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Send a JSON request and decode the JSON response.
    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            },
            None => Body::empty(),
        };

        let response = self.send(builder.body(body).expect("build request")).await;
        let status = response.status();
        (status, json_body(response).await)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) { self.call(Method::GET, uri, Some(token), None).await }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, Some(token), None).await
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec()
}

pub async fn json_body(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    if bytes.is_empty() {
        Value::Null
    }
    else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    }
}

/// Two companies with an admin and employees each, plus a platform admin
pub struct Fixture {
    pub app:            TestApp,
    pub acme:           companies::Model,
    pub globex:         companies::Model,
    pub platform_admin: users::Model,
    pub acme_admin:     users::Model,
    pub acme_employee:  users::Model,
    pub acme_employee2: users::Model,
    pub globex_admin:   users::Model,
    pub globex_employee: users::Model,
}

impl Fixture {
    pub async fn new() -> Self { Self::with_app(TestApp::new().await).await }

    pub async fn with_app(app: TestApp) -> Self {
        let acme = app.company("Acme Expo", "ACME01").await;
        let globex = app.company("Globex", "GLOBEX").await;
        let platform_admin = app.user("root@expo.test", UserRole::PlatformAdmin, None).await;
        let acme_admin = app.user("admin@acme.test", UserRole::CompanyAdmin, Some(acme.id)).await;
        let acme_employee = app.user("ravi@acme.test", UserRole::Employee, Some(acme.id)).await;
        let acme_employee2 = app.user("meera@acme.test", UserRole::Employee, Some(acme.id)).await;
        let globex_admin = app.user("admin@globex.test", UserRole::CompanyAdmin, Some(globex.id)).await;
        let globex_employee = app.user("hank@globex.test", UserRole::Employee, Some(globex.id)).await;

        Self {
            app,
            acme,
            globex,
            platform_admin,
            acme_admin,
            acme_employee,
            acme_employee2,
            globex_admin,
            globex_employee,
        }
    }

    pub fn token(&self, user: &users::Model) -> String { self.app.token(user) }
}
