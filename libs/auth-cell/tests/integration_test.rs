use assert_matches::assert_matches;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::models::{AuthError, LoginForm, LoginKind};
use auth_cell::router::auth_routes;
use auth_cell::services::LoginService;
use shared_utils::test_utils::TestConfig;

fn service_for(mock_server: &MockServer) -> LoginService {
    LoginService::new(&TestConfig::with_base_url(mock_server.uri()).to_app_config())
}

fn member_form(email: &str, password: &str) -> LoginForm {
    LoginForm {
        username: None,
        email: Some(email.into()),
        password: password.into(),
    }
}

#[tokio::test]
async fn test_admin_login_uses_username() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .and(body_json(json!({"username": "admin", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success", "token": "adm-token"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let form = LoginForm {
        username: Some("admin".into()),
        email: None,
        password: "secret".into(),
    };
    let token = service_for(&mock_server).login(LoginKind::Admin, &form).await.unwrap();
    assert_eq!(token, "adm-token");
}

#[tokio::test]
async fn test_failure_status_is_rejection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "failure", "message": "Invalid credentials"})),
        )
        .mount(&mock_server)
        .await;

    let form = LoginForm {
        username: Some("admin".into()),
        email: None,
        password: "wrong".into(),
    };
    let result = service_for(&mock_server).login(LoginKind::Admin, &form).await;
    assert_eq!(result, Err(AuthError::Rejected("Invalid credentials".into())));
}

#[tokio::test]
async fn test_unauthorized_patient_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/patient/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server)
        .login(LoginKind::Patient, &member_form("pat@clinic.test", "nope"))
        .await;
    assert_matches!(result, Err(AuthError::Rejected(msg)) if msg == "Invalid credentials");
}

#[tokio::test]
async fn test_blank_patient_credentials_send_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server)
        .login(LoginKind::Patient, &member_form("  ", "pw"))
        .await;
    assert_eq!(result, Err(AuthError::MissingCredentials));
}

#[tokio::test]
async fn test_login_route_sets_session_cookies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/doctor/login"))
        .and(body_json(json!({"email": "doc@clinic.test", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "doc-token"})))
        .mount(&mock_server)
        .await;

    let app = auth_routes(TestConfig::with_base_url(mock_server.uri()).to_arc());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login/doctor")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("email=doc%40clinic.test&password=pw"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/doctor/appointments");

    let cookies: Vec<_> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("token=doc-token;")));
    assert!(cookies.iter().any(|c| c.starts_with("userRole=doctor;")));
}

#[tokio::test]
async fn test_logout_clears_cookies() {
    let app = auth_routes(TestConfig::default().to_arc());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/logout")
                .header(header::COOKIE, "token=abc; userRole=admin")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[header::LOCATION], "/");
    let cleared = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter(|v| v.to_str().unwrap().contains("Max-Age=0"))
        .count();
    assert_eq!(cleared, 2);
}
