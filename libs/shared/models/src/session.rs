use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "userRole";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "doctor")]
    Doctor,
    /// Anonymous visitor browsing as a patient.
    #[serde(rename = "patient")]
    Patient,
    #[serde(rename = "loggedPatient")]
    LoggedPatient,
    #[default]
    #[serde(other)]
    Anonymous,
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "admin" => Role::Admin,
            "doctor" => Role::Doctor,
            "patient" => Role::Patient,
            "loggedPatient" => Role::LoggedPatient,
            _ => Role::Anonymous,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Patient => "patient",
            Role::LoggedPatient => "loggedPatient",
            Role::Anonymous => "anonymous",
        }
    }

    /// Roles that must always travel with a token.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Role::Admin | Role::Doctor | Role::LoggedPatient)
    }

    /// Role name the API expects in `/{user}/` path segments.
    pub fn api_user(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            _ => "patient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session expired or invalid login. Please log in again.")]
    Inconsistent { role: Role },

    #[error("You are not logged in. Please log in again.")]
    MissingToken,

    #[error("This page requires the {required} role")]
    WrongRole { required: Role, actual: Role },
}

/// String key/value storage backing the session (browser-storage semantics).
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(entries: &[(&str, &str)]) -> Self {
        let store = Self::new();
        for (key, value) in entries {
            store.set(key, value);
        }
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok().and_then(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// The current viewer: role plus bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub role: Role,
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(role: Role, token: Option<String>) -> Self {
        let token = token.filter(|t| !t.trim().is_empty());
        Self { role, token }
    }

    /// Read the session from storage. An authenticated role stored without a
    /// token is inconsistent: both keys are cleared and an error returned so
    /// the caller can force a logout.
    pub fn load(store: &dyn SessionStore) -> Result<Self, SessionError> {
        let role = store.get(ROLE_KEY).map(|r| Role::parse(&r)).unwrap_or_default();
        let session = Self::new(role, store.get(TOKEN_KEY));

        if session.role.is_authenticated() && session.token.is_none() {
            tracing::warn!("Session role {} present without token, forcing logout", session.role);
            Self::clear(store);
            return Err(SessionError::Inconsistent { role: session.role });
        }

        Ok(session)
    }

    pub fn establish(store: &dyn SessionStore, role: Role, token: &str) -> Self {
        store.set(TOKEN_KEY, token);
        store.set(ROLE_KEY, role.as_str());
        Self::new(role, Some(token.to_string()))
    }

    pub fn clear(store: &dyn SessionStore) {
        store.remove(TOKEN_KEY);
        store.remove(ROLE_KEY);
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn require_token(&self) -> Result<&str, SessionError> {
        self.token().ok_or(SessionError::MissingToken)
    }

    pub fn require_role(&self, required: Role) -> Result<&str, SessionError> {
        if self.role != required {
            return Err(SessionError::WrongRole { required, actual: self.role });
        }
        self.require_token()
    }
}
