use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_gateway::{ApiPath, ClinicApiClient};
use shared_models::GatewayError;

use crate::models::{Patient, PatientError, PatientProfileResponse};

pub struct PatientService {
    client: ClinicApiClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: ClinicApiClient::new(config),
        }
    }

    /// Profile of the patient the token belongs to.
    pub async fn get_profile(&self, token: &str) -> Result<Patient, GatewayError> {
        debug!("Fetching patient profile");

        let response: PatientProfileResponse =
            self.client.get(&ApiPath::new("/patient").secret(token)).await?;

        response.patient.ok_or_else(|| {
            warn!("Patient profile response carried no patient");
            GatewayError::Decode(PatientError::ProfileUnavailable.to_string())
        })
    }

    pub async fn all_patients(&self, token: &str) -> Result<Vec<Patient>, GatewayError> {
        debug!("Fetching all patients");
        self.client.get(&ApiPath::new("/patient/all").secret(token)).await
    }
}
