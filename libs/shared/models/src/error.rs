use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::session::SessionError;

/// Failure talking to the clinic REST API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status})")]
    Status { status: u16, message: Option<String> },

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Status { status: 401 | 403, .. })
    }

    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Transport(_) => "System error. Please try again later.".to_string(),
            GatewayError::Status { message: Some(message), .. } if !message.trim().is_empty() => {
                message.clone()
            }
            GatewayError::Status { status, .. } => format!("Request failed with status {}", status),
            GatewayError::Decode(_) => "Received an unexpected response from the server.".to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Upstream error: {0}")]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Gateway(err) if err.is_unauthorized() => {
                (StatusCode::UNAUTHORIZED, err.user_message())
            }
            AppError::Gateway(err) => (StatusCode::BAD_GATEWAY, err.user_message()),
            AppError::Session(SessionError::WrongRole { .. }) => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::Session(err) => (StatusCode::UNAUTHORIZED, err.to_string()),
        };

        tracing::error!("Error: {}: {}", status, self);

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
