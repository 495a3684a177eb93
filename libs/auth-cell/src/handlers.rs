use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::{Notice, Role, Session};
use shared_utils::extractor::CookieSessionStore;
use shared_utils::html::render_notices;

use crate::models::{AuthError, LoginForm, LoginKind};
use crate::services::LoginService;

/// Landing page of each role after login.
pub fn dashboard_for(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin/overview",
        Role::Doctor => "/doctor/appointments",
        Role::LoggedPatient => "/patient/appointments",
        _ => "/",
    }
}

pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Path(kind): Path<LoginKind>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let service = LoginService::new(&config);

    match service.login(kind, &form).await {
        Ok(token) => {
            let store = CookieSessionStore::from_headers(&headers);
            let session = Session::establish(&store, kind.session_role(), &token);
            debug!("Session established for {}", session.role);

            let mut response = Redirect::to(dashboard_for(session.role)).into_response();
            store.write_to(response.headers_mut());
            Ok(response)
        }
        Err(AuthError::Gateway(err)) => Err(err.into()),
        Err(err) => {
            warn!("Login failed: {}", err);
            let status = match err {
                AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
                _ => StatusCode::UNAUTHORIZED,
            };
            Ok((status, render_notices(&[Notice::error(err.to_string())])).into_response())
        }
    }
}

pub async fn logout(headers: HeaderMap) -> Response {
    let store = CookieSessionStore::from_headers(&headers);
    Session::clear(&store);

    let mut response = Redirect::to("/").into_response();
    store.write_to(response.headers_mut());
    response
}
