use std::sync::Arc;

use axum::{routing::{get, post}, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors).post(handlers::save_doctor))
        .route("/{doctor_id}/delete", post(handlers::delete_doctor))
        .with_state(state)
}
