use reqwest::Method;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_gateway::{ApiPath, ClinicApiClient};
use shared_models::GatewayError;

use crate::models::{AuthError, LoginForm, LoginKind, LoginRequest, LoginResponse};

pub struct LoginService {
    client: ClinicApiClient,
}

impl LoginService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: ClinicApiClient::new(config),
        }
    }

    /// Build the request body for `kind`. Blank fields are rejected before
    /// any request is sent.
    pub fn credentials(kind: LoginKind, form: &LoginForm) -> Result<LoginRequest, AuthError> {
        let password = form.password.trim();
        let identity = match kind {
            LoginKind::Admin => form.username.as_deref(),
            LoginKind::Doctor | LoginKind::Patient => form.email.as_deref(),
        }
        .map(str::trim)
        .unwrap_or_default();

        if identity.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        Ok(match kind {
            LoginKind::Admin => LoginRequest::Admin {
                username: identity.to_string(),
                password: password.to_string(),
            },
            _ => LoginRequest::Member {
                email: identity.to_string(),
                password: password.to_string(),
            },
        })
    }

    /// Exchange credentials for a token.
    pub async fn login(&self, kind: LoginKind, form: &LoginForm) -> Result<String, AuthError> {
        let request = Self::credentials(kind, form)?;
        debug!("Submitting {:?} login", kind);

        let body = serde_json::to_value(&request).map_err(GatewayError::from)?;
        let response: LoginResponse = match self
            .client
            .request(Method::POST, &ApiPath::new(kind.endpoint()), &[], Some(body))
            .await
        {
            Ok(response) => response,
            Err(GatewayError::Status { status, message }) if (400..500).contains(&status) => {
                warn!("{:?} login rejected ({})", kind, status);
                return Err(AuthError::Rejected(
                    message.unwrap_or_else(|| "Invalid credentials".to_string()),
                ));
            }
            Err(err) => return Err(err.into()),
        };

        if response.is_failure() {
            return Err(AuthError::Rejected(
                response.message.unwrap_or_else(|| "Invalid credentials".to_string()),
            ));
        }

        match response.token.filter(|t| !t.trim().is_empty()) {
            Some(token) => {
                info!("{:?} login succeeded", kind);
                Ok(token)
            }
            None => Err(AuthError::Rejected(
                response.message.unwrap_or_else(|| "Login failed".to_string()),
            )),
        }
    }
}
