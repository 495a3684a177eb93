use axum::body::{to_bytes, Body};
use http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clinic_portal::router::create_router;
use shared_utils::test_utils::{MockClinicResponses, TestConfig, TEST_TOKEN};

async fn send(mock_server: &MockServer, request: Request<Body>) -> (StatusCode, http::HeaderMap, String) {
    let app = create_router(TestConfig::with_base_url(mock_server.uri()).to_arc());
    let response = app.oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

fn patient_cookie() -> String {
    format!("token={}; userRole=loggedPatient", TEST_TOKEN)
}

async fn mount_doctors(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/doctor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockClinicResponses::doctors_response(vec![
            MockClinicResponses::doctor(10, "Alice Smith", &["09:00 - 10:00"]),
        ])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_inconsistent_session_is_logged_out() {
    let mock_server = MockServer::start().await;

    let request = Request::builder()
        .uri("/doctor/appointments")
        .header(header::COOKIE, "userRole=doctor")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&mock_server, request).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/");
    let cleared: Vec<_> = headers.get_all(header::SET_COOKIE).iter().collect();
    assert_eq!(cleared.len(), 2);
}

#[tokio::test]
async fn test_landing_shows_directory_without_actions() {
    let mock_server = MockServer::start().await;
    mount_doctors(&mock_server).await;

    let (status, _, body) = send(&mock_server, Request::builder().uri("/").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Alice Smith"));
    assert!(!body.contains("doctor-card-actions"));
}

#[tokio::test]
async fn test_logged_patient_directory_offers_booking() {
    let mock_server = MockServer::start().await;
    mount_doctors(&mock_server).await;

    let request = Request::builder()
        .uri("/doctors")
        .header(header::COOKIE, patient_cookie())
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&mock_server, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"data-action="book" data-doctor-id="10""#));
}

#[tokio::test]
async fn test_anonymous_cannot_see_patient_appointments() {
    let mock_server = MockServer::start().await;

    let (status, _, _) = send(
        &mock_server,
        Request::builder().uri("/patient/appointments").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unconfirmed_cancel_renders_prompt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/patient/appointments/5/cancel")
        .header(header::COOKIE, patient_cookie())
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&mock_server, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Are you sure you want to cancel this appointment?"));
}

#[tokio::test]
async fn test_booking_refreshes_next_appointment() {
    let mock_server = MockServer::start().await;
    mount_doctors(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(format!("/patient/{}", TEST_TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockClinicResponses::patient_profile_response(20, "Pat Doe")))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/appointments/{}", TEST_TOKEN)))
        .respond_with(ResponseTemplate::new(201).set_body_json(MockClinicResponses::message("Booked successfully")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/patient/20/patient/{}", TEST_TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "appointments": [MockClinicResponses::appointment_summary(7, 20, "Alice Smith", "2099-06-01T09:00:00", 0)]
        })))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/patient/book/10")
        .header(header::COOKIE, patient_cookie())
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("date=2099-06-01&time=09%3A00+-+10%3A00"))
        .unwrap();
    let (status, _, body) = send(&mock_server, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("toast-success"));
    assert!(body.contains(r#"<div class="next-appointment" data-id="7">"#));
}

#[tokio::test]
async fn test_refused_reschedule_still_renders_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/patient/{}", TEST_TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockClinicResponses::patient_profile_response(20, "Pat Doe")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/patient/20/patient/{}", TEST_TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "appointments": [MockClinicResponses::appointment_summary(7, 20, "Alice Smith", "2099-06-01T09:00:00", 0)]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/patient/appointments/7/reschedule")
        .header(header::COOKIE, patient_cookie())
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("date=&time="))
        .unwrap();
    let (status, _, body) = send(&mock_server, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Please select both date and time"));
    assert!(body.contains(r#"data-id="7""#));
}
