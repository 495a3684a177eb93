use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use admin_cell::router::admin_routes;
use appointment_cell::router::{doctor_schedule_routes, patient_appointment_routes};
use auth_cell::router::auth_routes;
use doctor_cell::handlers::landing;
use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;
use shared_utils::extractor::session_middleware;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(landing))
        .with_state(state.clone())
        .nest("/auth", auth_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/patient", patient_appointment_routes(state.clone()))
        .nest("/doctor", doctor_schedule_routes(state.clone()))
        .nest("/admin", admin_routes(state))
        .layer(middleware::from_fn(session_middleware))
}
