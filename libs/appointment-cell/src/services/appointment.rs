use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_gateway::{ApiPath, ClinicApiClient};
use shared_models::{GatewayError, Outcome, Role};

use crate::models::{
    Appointment, AppointmentStatus, AppointmentSubmission, PatientAppointmentsResponse, ScheduleQuery,
};

/// Appointment endpoints, as seen by the views and controllers.
#[async_trait]
pub trait AppointmentGateway: Send + Sync {
    /// Appointments of one patient, already restricted to `patient_id`.
    async fn patient_appointments(
        &self,
        patient_id: i64,
        viewer: Role,
        token: &str,
    ) -> Result<Vec<Appointment>, GatewayError>;

    async fn doctor_appointments(
        &self,
        query: &ScheduleQuery,
        token: &str,
    ) -> Result<Vec<Appointment>, GatewayError>;

    async fn all_appointments(&self, token: &str) -> Result<Vec<Appointment>, GatewayError>;

    async fn book(&self, submission: &AppointmentSubmission, token: &str) -> Result<Outcome, GatewayError>;

    async fn update(&self, submission: &AppointmentSubmission, token: &str) -> Result<Outcome, GatewayError>;

    async fn update_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
        token: &str,
    ) -> Result<Outcome, GatewayError>;

    async fn cancel(&self, appointment_id: i64, token: &str) -> Result<Outcome, GatewayError>;
}

pub struct AppointmentService {
    client: ClinicApiClient,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: ClinicApiClient::new(config),
        }
    }
}

#[async_trait]
impl AppointmentGateway for AppointmentService {
    async fn patient_appointments(
        &self,
        patient_id: i64,
        viewer: Role,
        token: &str,
    ) -> Result<Vec<Appointment>, GatewayError> {
        debug!("Fetching appointments for patient {}", patient_id);

        let path = ApiPath::new("/patient")
            .segment(patient_id)
            .segment(viewer.api_user())
            .secret(token);
        let response: PatientAppointmentsResponse = self.client.get(&path).await?;

        // The endpoint may return more than the requested patient's rows.
        Ok(response
            .appointments
            .into_iter()
            .filter(|a| a.patient_id == Some(patient_id))
            .collect())
    }

    async fn doctor_appointments(
        &self,
        query: &ScheduleQuery,
        token: &str,
    ) -> Result<Vec<Appointment>, GatewayError> {
        debug!("Fetching doctor schedule for {}", query.date);

        let params = [
            ("date", query.date.format("%Y-%m-%d").to_string()),
            ("patientName", query.patient_name.clone().unwrap_or_else(|| "null".to_string())),
            ("token", token.to_string()),
        ];

        self.client
            .request(
                Method::GET,
                &ApiPath::new("/appointments/doctor-appointments"),
                &params,
                None,
            )
            .await
    }

    async fn all_appointments(&self, token: &str) -> Result<Vec<Appointment>, GatewayError> {
        debug!("Fetching all appointments");
        self.client.get(&ApiPath::new("/appointments/all").secret(token)).await
    }

    async fn book(&self, submission: &AppointmentSubmission, token: &str) -> Result<Outcome, GatewayError> {
        info!(
            "Booking appointment with doctor {} at {}",
            submission.doctor.id, submission.appointment_date
        );

        let body = serde_json::to_value(submission)?;
        self.client
            .mutate(Method::POST, &ApiPath::new("/appointments").secret(token), Some(body))
            .await
    }

    async fn update(&self, submission: &AppointmentSubmission, token: &str) -> Result<Outcome, GatewayError> {
        info!("Updating appointment {:?} to {}", submission.id, submission.appointment_date);

        let body = serde_json::to_value(submission)?;
        self.client
            .mutate(Method::PUT, &ApiPath::new("/appointments").secret(token), Some(body))
            .await
    }

    async fn update_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
        token: &str,
    ) -> Result<Outcome, GatewayError> {
        info!("Setting appointment {} status to {}", appointment_id, status);

        let path = ApiPath::new("/appointments/status")
            .segment(appointment_id)
            .segment(status.code())
            .secret(token);
        self.client.mutate(Method::PATCH, &path, None).await
    }

    async fn cancel(&self, appointment_id: i64, token: &str) -> Result<Outcome, GatewayError> {
        info!("Cancelling appointment {}", appointment_id);

        let path = ApiPath::new("/appointments/cancel").segment(appointment_id).secret(token);
        self.client.mutate(Method::DELETE, &path, None).await
    }
}
