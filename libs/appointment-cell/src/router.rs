// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Logged-in patient pages, nested under `/patient`.
pub fn patient_appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/appointments", get(handlers::patient_appointments))
        .route("/appointments/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .route("/appointments/{appointment_id}/reschedule", post(handlers::reschedule_appointment))
        .route("/book/{doctor_id}", get(handlers::booking_form).post(handlers::book_appointment))
        .route("/next", get(handlers::next_appointment))
        .with_state(state)
}

/// Doctor dashboard pages, nested under `/doctor`.
pub fn doctor_schedule_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/appointments", get(handlers::doctor_schedule))
        .route("/appointments/{appointment_id}/status/{status}", post(handlers::change_status))
        .with_state(state)
}
