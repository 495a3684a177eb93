use std::sync::Arc;

use serde_json::{json, Value};

use shared_config::AppConfig;

pub const TEST_TOKEN: &str = "test-token";

pub struct TestConfig {
    pub api_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Self { api_base_url: api_base_url.into() }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig::new(self.api_base_url.clone())
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned clinic API payloads in the shapes the backend emits.
pub struct MockClinicResponses;

impl MockClinicResponses {
    pub fn doctor(id: i64, name: &str, times: &[&str]) -> Value {
        json!({
            "id": id,
            "name": name,
            "email": format!("doctor{}@clinic.test", id),
            "phone": "5550001111",
            "speciality": "Cardiology",
            "availableTimes": times
        })
    }

    pub fn doctors_response(doctors: Vec<Value>) -> Value {
        json!({ "doctors": doctors })
    }

    pub fn patient(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "email": "patient@clinic.test",
            "phone": "5552223333",
            "address": "1 Main St"
        })
    }

    pub fn patient_profile_response(id: i64, name: &str) -> Value {
        json!({ "patient": Self::patient(id, name) })
    }

    /// Flat appointment summary as listed for a patient.
    pub fn appointment_summary(
        id: i64,
        patient_id: i64,
        doctor_name: &str,
        appointment_time: &str,
        status: i64,
    ) -> Value {
        json!({
            "id": id,
            "doctorId": 10,
            "doctorName": doctor_name,
            "patientId": patient_id,
            "patientName": "Pat Doe",
            "patientEmail": "patient@clinic.test",
            "patientPhone": "5552223333",
            "patientAddress": "1 Main St",
            "appointmentTime": appointment_time,
            "status": status,
            "appointmentDate": appointment_time.split('T').next().unwrap_or_default(),
        })
    }

    /// Appointment entity with nested doctor and patient, as listed for a doctor.
    pub fn appointment_entity(id: i64, patient_name: &str, appointment_date: &str, status: &str) -> Value {
        json!({
            "id": id,
            "doctor": Self::doctor(10, "Alice Smith", &["09:00 - 10:00"]),
            "patient": Self::patient(20, patient_name),
            "appointmentDate": appointment_date,
            "status": status,
            "notes": null
        })
    }

    pub fn message(message: &str) -> Value {
        json!({ "message": message })
    }
}
