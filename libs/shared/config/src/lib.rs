use std::env;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the clinic REST API, without a trailing slash.
    pub api_base_url: String,
    pub bind_addr: String,
    api_base_url_set: bool,
}

impl AppConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            api_base_url_set: true,
        }
    }

    pub fn from_env() -> Self {
        let api_base_url = env::var("CLINIC_API_BASE_URL").ok();
        let api_base_url_set = api_base_url.is_some();

        let config = Self {
            api_base_url: api_base_url
                .unwrap_or_else(|| {
                    warn!("CLINIC_API_BASE_URL not set, using default");
                    DEFAULT_API_BASE_URL.to_string()
                })
                .trim_end_matches('/')
                .to_string(),
            bind_addr: env::var("PORTAL_BIND_ADDR")
                .unwrap_or_else(|_| {
                    warn!("PORTAL_BIND_ADDR not set, using default");
                    DEFAULT_BIND_ADDR.to_string()
                }),
            api_base_url_set,
        };

        if !config.is_configured() {
            warn!("Portal not fully configured - clinic API base URL falls back to {}", DEFAULT_API_BASE_URL);
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        self.api_base_url_set && !self.api_base_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slash() {
        let config = AppConfig::new("http://clinic.local/api/");
        assert_eq!(config.api_base_url, "http://clinic.local/api");
        assert!(config.is_configured());
    }
}
