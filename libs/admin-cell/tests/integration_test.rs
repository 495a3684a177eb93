use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Extension,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use admin_cell::router::admin_routes;
use admin_cell::services::AdminService;
use admin_cell::DashboardStats;
use shared_models::{Role, Session};
use shared_utils::test_utils::{MockClinicResponses, TestConfig, TEST_TOKEN};

async fn mount_stats(mock_server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/admin/stats/{}", TEST_TOKEN)))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(json!({"doctors": 3, "patients": 12, "appointments": 40})),
        )
        .mount(mock_server)
        .await;
}

async fn get_overview(mock_server: &MockServer, session: Session) -> (StatusCode, String) {
    let app = admin_routes(TestConfig::with_base_url(mock_server.uri()).to_arc()).layer(Extension(session));
    let response = app
        .oneshot(Request::builder().uri("/overview").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_dashboard_stats() {
    let mock_server = MockServer::start().await;
    mount_stats(&mock_server, 200).await;

    let service = AdminService::new(&TestConfig::with_base_url(mock_server.uri()).to_app_config());
    let stats = service.dashboard_stats(TEST_TOKEN).await.unwrap();
    assert_eq!(stats, DashboardStats { doctors: 3, patients: 12, appointments: 40 });
}

#[tokio::test]
async fn test_overview_renders_all_sections() {
    let mock_server = MockServer::start().await;
    mount_stats(&mock_server, 200).await;

    Mock::given(method("GET"))
        .and(path(format!("/appointments/all/{}", TEST_TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockClinicResponses::appointment_entity(5, "Pat Doe", "2025-06-01T09:00:00", "PENDING"),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/patient/all/{}", TEST_TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([MockClinicResponses::patient(20, "Pat Doe")])))
        .mount(&mock_server)
        .await;

    let (status, body) = get_overview(&mock_server, Session::new(Role::Admin, Some(TEST_TOKEN.into()))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<span class="stat-value">40</span>"#));
    assert!(body.contains("Dr. Alice Smith"));
    assert!(!body.contains("appointment-actions"));
    assert!(body.contains(r#"<tr data-id="20">"#));
}

#[tokio::test]
async fn test_overview_degrades_when_listing_fails() {
    let mock_server = MockServer::start().await;
    mount_stats(&mock_server, 200).await;

    Mock::given(method("GET"))
        .and(path(format!("/appointments/all/{}", TEST_TOKEN)))
        .respond_with(ResponseTemplate::new(500).set_body_json(MockClinicResponses::message("Database down")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/patient/all/{}", TEST_TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let (status, body) = get_overview(&mock_server, Session::new(Role::Admin, Some(TEST_TOKEN.into()))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<div class="toast toast-error" role="status">Database down</div>"#));
    assert!(body.contains("No patients found."));
}

#[tokio::test]
async fn test_overview_requires_admin() {
    let mock_server = MockServer::start().await;
    let (status, _) = get_overview(&mock_server, Session::new(Role::Doctor, Some(TEST_TOKEN.into()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
