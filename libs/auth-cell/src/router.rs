use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/login/{kind}", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .with_state(state)
}
