use std::collections::HashMap;
use std::sync::Mutex;

use axum::{
    body::Body,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use headers::{Cookie, HeaderMapExt};
use serde::Deserialize;
use tracing::warn;

use shared_models::session::{ROLE_KEY, TOKEN_KEY};
use shared_models::{Preconfirmed, Session, SessionStore};

/// Session storage backed by request cookies. Writes are buffered and
/// emitted as `Set-Cookie` headers on the response.
#[derive(Debug, Default)]
pub struct CookieSessionStore {
    entries: Mutex<HashMap<String, String>>,
    changes: Mutex<Vec<(String, Option<String>)>>,
}

impl CookieSessionStore {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut entries = HashMap::new();
        if let Some(cookie) = headers.typed_get::<Cookie>() {
            for key in [TOKEN_KEY, ROLE_KEY] {
                if let Some(value) = cookie.get(key) {
                    entries.insert(key.to_string(), value.to_string());
                }
            }
        }

        Self {
            entries: Mutex::new(entries),
            changes: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, key: &str, value: Option<&str>) {
        if let Ok(mut changes) = self.changes.lock() {
            changes.push((key.to_string(), value.map(str::to_string)));
        }
    }

    /// Append the buffered cookie changes to a response.
    pub fn write_to(&self, headers: &mut HeaderMap) {
        let changes = match self.changes.lock() {
            Ok(changes) => changes.clone(),
            Err(_) => return,
        };

        for (key, value) in changes {
            let cookie = match value {
                Some(value) => format!("{}={}; Path=/; HttpOnly; SameSite=Lax", key, value),
                None => format!("{}=; Path=/; Max-Age=0", key),
            };
            match HeaderValue::from_str(&cookie) {
                Ok(header) => {
                    headers.append(SET_COOKIE, header);
                }
                Err(_) => warn!("Skipping cookie {} with invalid characters", key),
            }
        }
    }
}

impl SessionStore for CookieSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok().and_then(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        self.record(key, Some(value));
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
        self.record(key, None);
    }
}

/// Form body of an irreversible action; `confirm=true` answers the prompt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmForm {
    pub confirm: Option<String>,
}

impl ConfirmForm {
    pub fn confirmation(&self) -> Preconfirmed {
        Preconfirmed(matches!(self.confirm.as_deref(), Some("true") | Some("yes") | Some("1")))
    }
}

// Loads the session from cookies into request extensions. An inconsistent
// session is logged out and sent back to the landing page.
pub async fn session_middleware(mut request: Request<Body>, next: Next) -> Response {
    let store = CookieSessionStore::from_headers(request.headers());

    match Session::load(&store) {
        Ok(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(err) => {
            warn!("Rejecting request to {}: {}", request.uri().path(), err);
            let mut response = Redirect::to("/").into_response();
            store.write_to(response.headers_mut());
            response
        }
    }
}
