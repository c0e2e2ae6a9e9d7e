//! HTTP surface tests: auth gate, login round trip, page rendering and the
//! incident workflow driven through real form submissions.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use migration::{Migrator, MigratorTrait};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, EntityTrait};
use statuspage::auth::hash_password;
use statuspage::config::{AppConfig, SessionConfig};
use statuspage::entity::{operator, service};
use statuspage::web::router;
use statuspage::{AppResources, settings};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

async fn test_resources() -> (AppResources, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.expect("connect");
    Migrator::up(&db, None).await.expect("migrate");

    let site_settings = settings::load_or_init(&db).await.expect("settings");

    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        session: SessionConfig::default(),
    };

    let resources = AppResources {
        db: Arc::new(db.clone()),
        config: Arc::new(config),
        settings: Arc::new(RwLock::new(site_settings)),
    };
    (resources, db)
}

async fn insert_operator(db: &DatabaseConnection, username: &str, password: &str) {
    operator::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password).expect("hash")),
        created_at: Set(OffsetDateTime::now_utc()),
        last_login_at: Set(None),
    }
    .insert(db)
    .await
    .expect("insert operator");
}

async fn insert_service(db: &DatabaseConnection, name: &str, sort_order: i32) -> service::Model {
    service::ActiveModel {
        name: Set(name.to_string()),
        description: Set(String::new()),
        status: Set("operational".to_string()),
        sort_order: Set(sort_order),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert service")
}

fn test_server(resources: AppResources) -> TestServer {
    TestServer::builder()
        .save_cookies()
        .build(router(resources))
        .expect("test server")
}

async fn sign_in(server: &TestServer, username: &str, password: &str) {
    let response = server
        .post("/dashboard/login")
        .form(&[("username", username), ("password", password)])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    response.assert_header("location", "/dashboard");
}

#[tokio::test]
async fn public_page_renders_without_auth() {
    let (resources, db) = test_resources().await;
    insert_service(&db, "API", 1).await;

    let server = test_server(resources);
    let response = server.get("/").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("All Systems Operational"));
    assert!(body.contains("API"));
}

#[tokio::test]
async fn health_endpoint() {
    let (resources, _db) = test_resources().await;
    let server = test_server(resources);
    let response = server.get("/healthz").await;
    response.assert_status_ok();
    response.assert_text("ok");
}

#[tokio::test]
async fn dashboard_requires_auth() {
    let (resources, _db) = test_resources().await;
    let server = test_server(resources);

    for path in [
        "/dashboard",
        "/dashboard/incident/new",
        "/dashboard/incident/1",
        "/dashboard/settings",
    ] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", "/dashboard/login");
    }
}

#[tokio::test]
async fn bad_credentials_re_render_login() {
    let (resources, db) = test_resources().await;
    insert_operator(&db, "admin", "s3cret").await;

    let server = test_server(resources);
    let response = server
        .post("/dashboard/login")
        .form(&[("username", "admin"), ("password", "wrong")])
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("Invalid username or password."));
}

#[tokio::test]
async fn login_then_dashboard_then_logout() {
    let (resources, db) = test_resources().await;
    insert_operator(&db, "admin", "s3cret").await;
    insert_service(&db, "API", 1).await;

    let server = test_server(resources);
    sign_in(&server, "admin", "s3cret").await;

    let response = server.get("/dashboard").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("Dashboard"));
    assert!(body.contains("admin"));
    assert!(body.contains("API"));

    let response = server.post("/dashboard/logout").await;
    response.assert_status(StatusCode::SEE_OTHER);

    let response = server.get("/dashboard").await;
    response.assert_status(StatusCode::SEE_OTHER);
    response.assert_header("location", "/dashboard/login");
}

#[tokio::test]
async fn incident_workflow_through_forms() {
    let (resources, db) = test_resources().await;
    insert_operator(&db, "admin", "s3cret").await;
    let api = insert_service(&db, "API", 1).await;
    let web = insert_service(&db, "Website", 2).await;

    let server = test_server(resources);
    sign_in(&server, "admin", "s3cret").await;

    let api_id = api.id.to_string();
    let web_id = web.id.to_string();
    let response = server
        .post("/dashboard/incident/new")
        .form(&[
            ("title", "Elevated error rates"),
            ("status", "investigating"),
            ("impact", "major"),
            ("services", api_id.as_str()),
            ("services", web_id.as_str()),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    response.assert_header("location", "/dashboard?notice=incident_created");

    // Affected services flip to partial on the public page.
    let body = server.get("/").await.text();
    assert!(body.contains("Partial System Outage"));
    assert!(body.contains("Elevated error rates"));

    let incident = statuspage::entity::incident::Entity::find()
        .one(&db)
        .await
        .expect("query")
        .expect("incident exists");

    let detail_path = format!("/dashboard/incident/{}", incident.id);
    let response = server.get(&detail_path).await;
    response.assert_status_ok();
    assert!(response.text().contains("Elevated error rates"));

    let response = server
        .post(&detail_path)
        .form(&[("status", "resolved"), ("message", "Rolled back the deploy.")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    let body = server.get("/").await.text();
    assert!(body.contains("All Systems Operational"));
    assert!(body.contains("Rolled back the deploy."));
}

#[tokio::test]
async fn invalid_incident_form_re_renders_with_errors() {
    let (resources, db) = test_resources().await;
    insert_operator(&db, "admin", "s3cret").await;

    let server = test_server(resources);
    sign_in(&server, "admin", "s3cret").await;

    let response = server
        .post("/dashboard/incident/new")
        .form(&[
            ("title", "   "),
            ("status", "investigating"),
            ("impact", "major"),
        ])
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("Title must not be empty."));
}

#[tokio::test]
async fn unknown_incident_is_404() {
    let (resources, db) = test_resources().await;
    insert_operator(&db, "admin", "s3cret").await;

    let server = test_server(resources);
    sign_in(&server, "admin", "s3cret").await;

    let response = server.get("/dashboard/incident/999").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .post("/dashboard/service/999/status")
        .form(&[("status", "degraded")])
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn manual_service_status_edit_via_form() {
    let (resources, db) = test_resources().await;
    insert_operator(&db, "admin", "s3cret").await;
    let api = insert_service(&db, "API", 1).await;

    let server = test_server(resources);
    sign_in(&server, "admin", "s3cret").await;

    let response = server
        .post(&format!("/dashboard/service/{}/status", api.id))
        .form(&[("status", "maintenance")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    response.assert_header("location", "/dashboard?notice=service_updated");

    let body = server.get("/").await.text();
    assert!(body.contains("Scheduled Maintenance"));
}

#[tokio::test]
async fn settings_form_updates_the_cached_singleton() {
    let (resources, db) = test_resources().await;
    insert_operator(&db, "admin", "s3cret").await;

    let server = test_server(resources);
    sign_in(&server, "admin", "s3cret").await;

    let response = server
        .post("/dashboard/settings")
        .form(&[
            ("company_name", "Acme Inc"),
            ("company_url", "https://acme.example"),
            ("logo_url", ""),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    // Public page reads the refreshed cache without a restart.
    let body = server.get("/").await.text();
    assert!(body.contains("Acme Inc"));
}
