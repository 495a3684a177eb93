use reqwest::Method;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_gateway::{ApiPath, ClinicApiClient};
use shared_models::{GatewayError, Outcome};

use crate::models::{Doctor, DoctorFilter, DoctorForm, DoctorListResponse};

/// Gateway functions for the `/doctor` endpoints.
pub struct DoctorService {
    client: ClinicApiClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: ClinicApiClient::new(config),
        }
    }

    pub fn client(&self) -> &ClinicApiClient {
        &self.client
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, GatewayError> {
        debug!("Fetching all doctors");

        let response: DoctorListResponse = self.client.get(&ApiPath::new("/doctor")).await?;
        Ok(response.doctors)
    }

    pub async fn filter_doctors(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>, GatewayError> {
        let [name, time, speciality] = filter.path_segments();
        debug!("Filtering doctors by name={}, time={}, speciality={}", name, time, speciality);

        let path = ApiPath::new("/doctor/filter")
            .segment(name)
            .segment(time)
            .segment(speciality);

        let response: DoctorListResponse = self.client.get(&path).await?;
        Ok(response.doctors)
    }

    /// Unfiltered listing when the filter is empty, else the filter endpoint.
    pub async fn search(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>, GatewayError> {
        if filter.is_empty() {
            self.list_doctors().await
        } else {
            self.filter_doctors(filter).await
        }
    }

    pub async fn save_doctor(&self, form: &DoctorForm, token: &str) -> Result<Outcome, GatewayError> {
        info!("Saving doctor profile for {}", form.email);

        let body = serde_json::to_value(form)?;
        self.client
            .mutate(Method::POST, &ApiPath::new("/doctor/save").secret(token), Some(body))
            .await
    }

    pub async fn update_doctor(&self, form: &DoctorForm, token: &str) -> Result<Outcome, GatewayError> {
        let Some(doctor_id) = form.id else {
            return Ok(Outcome::failed(Some("Doctor id is required for update".to_string())));
        };
        info!("Updating doctor {}", doctor_id);

        let body = serde_json::to_value(form)?;
        self.client
            .mutate(Method::PUT, &ApiPath::new("/doctor/update").secret(token), Some(body))
            .await
    }

    pub async fn delete_doctor(&self, doctor_id: i64, token: &str) -> Result<Outcome, GatewayError> {
        info!("Deleting doctor {}", doctor_id);

        self.client
            .mutate(Method::DELETE, &ApiPath::new("/doctor").segment(doctor_id).secret(token), None)
            .await
    }
}
