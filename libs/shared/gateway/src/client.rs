use std::fmt;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, Method, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::{GatewayError, Outcome};

/// A request path whose segments are percent-encoded. Credentials placed
/// with [`ApiPath::secret`] are masked in the loggable form.
#[derive(Debug, Clone)]
pub struct ApiPath {
    path: String,
    redacted: String,
}

impl ApiPath {
    pub fn new(root: &str) -> Self {
        Self {
            path: root.to_string(),
            redacted: root.to_string(),
        }
    }

    pub fn segment(mut self, segment: impl fmt::Display) -> Self {
        let encoded = urlencoding::encode(&segment.to_string()).into_owned();
        self.path.push('/');
        self.path.push_str(&encoded);
        self.redacted.push('/');
        self.redacted.push_str(&encoded);
        self
    }

    pub fn secret(mut self, secret: &str) -> Self {
        self.path.push('/');
        self.path.push_str(&urlencoding::encode(secret));
        self.redacted.push_str("/***");
        self
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn redacted(&self) -> &str {
        &self.redacted
    }
}

/// Thin HTTP client for the clinic REST API.
#[derive(Debug, Clone)]
pub struct ClinicApiClient {
    client: Client,
    base_url: String,
}

impl ClinicApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    async fn send(
        &self,
        method: Method,
        path: &ApiPath,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Response, GatewayError> {
        let url = format!("{}{}", self.base_url, path.as_str());
        debug!("Making {} request to {}{}", method, self.base_url, path.redacted());

        let mut req = self.client.request(method, &url).headers(self.get_headers());

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body_data) = body {
            req = req.json(body_data);
        }

        req.send().await.map_err(|e| {
            error!("Request to {} failed: {}", path.redacted(), e);
            GatewayError::Transport(e.to_string())
        })
    }

    /// Issue a request and decode a 2xx JSON body into `T`.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &ApiPath,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, query, body.as_ref()).await?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            error!("API error ({}) from {}", status, path.redacted());
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: extract_message(&text),
            });
        }

        serde_json::from_str::<T>(&text).map_err(|e| {
            warn!("Could not decode response from {}: {}", path.redacted(), e);
            GatewayError::Decode(e.to_string())
        })
    }

    pub async fn get<T>(&self, path: &ApiPath) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, &[], None).await
    }

    /// Issue a mutating request and normalize the answer to an [`Outcome`].
    /// Only transport failures are errors; a non-2xx answer is an
    /// unsuccessful outcome carrying the server's message, or one naming
    /// the status code when the body had none.
    pub async fn mutate(
        &self,
        method: Method,
        path: &ApiPath,
        body: Option<Value>,
    ) -> Result<Outcome, GatewayError> {
        let response = self.send(method, path, &[], body.as_ref()).await?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let message = extract_message(&text);

        if status.is_success() {
            debug!("{} succeeded ({})", path.redacted(), status);
            Ok(Outcome::ok(message))
        } else {
            warn!("{} rejected ({})", path.redacted(), status);
            let message = message.unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            Ok(Outcome::failed(Some(message)))
        }
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

/// Pull a human message out of a response body: the `message` field of a
/// JSON object, a bare JSON string, or short plain text.
pub fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Ok(Value::String(text)) => Some(text),
        Ok(_) => None,
        Err(_) if trimmed.len() <= 200 && !trimmed.starts_with('<') => Some(trimmed.to_string()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_path_encodes_and_redacts() {
        let path = ApiPath::new("/doctor/filter")
            .segment("Ann Lee")
            .segment("all")
            .secret("tok/en");

        assert_eq!(path.as_str(), "/doctor/filter/Ann%20Lee/all/tok%2Fen");
        assert_eq!(path.redacted(), "/doctor/filter/Ann%20Lee/all/***");
    }

    #[test]
    fn extract_message_shapes() {
        assert_eq!(extract_message(r#"{"message":"Slot unavailable"}"#).as_deref(), Some("Slot unavailable"));
        assert_eq!(extract_message(r#"{"error":"nope"}"#).as_deref(), Some("nope"));
        assert_eq!(extract_message(r#"{"doctors":[]}"#), None);
        assert_eq!(extract_message("Invalid credentials"), Some("Invalid credentials".to_string()));
        assert_eq!(extract_message("<html>oops</html>"), None);
        assert_eq!(extract_message("  "), None);
    }
}
