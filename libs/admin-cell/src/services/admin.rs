use tracing::debug;

use shared_config::AppConfig;
use shared_gateway::{ApiPath, ClinicApiClient};
use shared_models::GatewayError;

use crate::models::DashboardStats;

pub struct AdminService {
    client: ClinicApiClient,
}

impl AdminService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: ClinicApiClient::new(config),
        }
    }

    pub async fn dashboard_stats(&self, token: &str) -> Result<DashboardStats, GatewayError> {
        debug!("Fetching dashboard stats");
        self.client.get(&ApiPath::new("/admin/stats").secret(token)).await
    }
}
