use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::{GatewayError, Role};

/// Which login form was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginKind {
    Admin,
    Doctor,
    Patient,
}

impl LoginKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            LoginKind::Admin => "/admin/login",
            LoginKind::Doctor => "/doctor/login",
            LoginKind::Patient => "/patient/login",
        }
    }

    /// Session role established after a successful login.
    pub fn session_role(&self) -> Role {
        match self {
            LoginKind::Admin => Role::Admin,
            LoginKind::Doctor => Role::Doctor,
            LoginKind::Patient => Role::LoggedPatient,
        }
    }
}

/// Form fields from any login form. Admins log in with a username, doctors
/// and patients with an email.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LoginRequest {
    Admin { username: String, password: String },
    Member { email: String, password: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    pub fn is_failure(&self) -> bool {
        self.status.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("failure"))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Please enter both email and password")]
    MissingCredentials,

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_wire_shapes() {
        let admin = LoginRequest::Admin { username: "root".into(), password: "pw".into() };
        assert_eq!(serde_json::to_value(&admin).unwrap(), json!({"username": "root", "password": "pw"}));

        let member = LoginRequest::Member { email: "a@b.c".into(), password: "pw".into() };
        assert_eq!(serde_json::to_value(&member).unwrap(), json!({"email": "a@b.c", "password": "pw"}));
    }

    #[test]
    fn failure_status_detected() {
        let response: LoginResponse =
            serde_json::from_value(json!({"status": "failure", "message": "Invalid credentials"})).unwrap();
        assert!(response.is_failure());
        assert_eq!(LoginKind::Patient.session_role(), Role::LoggedPatient);
    }
}
