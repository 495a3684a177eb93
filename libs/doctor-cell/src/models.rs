use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// ==============================================================================
// CORE DOCTOR MODEL
// ==============================================================================

/// Canonical doctor shape. Every payload passes through [`RawDoctor`] first so
/// the alternate field names never leak past ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDoctor", rename_all = "camelCase")]
pub struct Doctor {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub speciality: Option<String>,
    /// Bookable slot labels such as `"09:00 - 10:00"`, in server order.
    pub available_times: Vec<String>,
}

impl Doctor {
    pub fn display_name(&self) -> &str {
        non_blank(self.name.as_deref()).unwrap_or("Unknown")
    }

    pub fn display_speciality(&self) -> &str {
        non_blank(self.speciality.as_deref()).unwrap_or("General")
    }

    pub fn offers_slot(&self, slot: &str) -> bool {
        self.available_times.iter().any(|t| t == slot)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDoctor {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    speciality: Option<String>,
    #[serde(default)]
    specialization: Option<String>,
    #[serde(default)]
    specialty: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    available_times: Vec<String>,
}

impl From<RawDoctor> for Doctor {
    fn from(raw: RawDoctor) -> Self {
        let speciality = [raw.speciality, raw.specialization, raw.specialty]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty());

        Self {
            id: raw.id,
            name: raw.name,
            email: raw.email,
            phone: raw.phone,
            speciality,
            available_times: raw.available_times,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorListResponse {
    #[serde(default)]
    pub doctors: Vec<Doctor>,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Directory filter. Blank inputs mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DoctorFilter {
    pub name: Option<String>,
    pub time: Option<String>,
    pub speciality: Option<String>,
}

impl DoctorFilter {
    pub fn new(name: Option<&str>, time: Option<&str>, speciality: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            time: time.map(str::to_string),
            speciality: speciality.map(str::to_string),
        }
        .normalized()
    }

    pub fn normalized(self) -> Self {
        let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            name: clean(self.name),
            time: clean(self.time),
            speciality: clean(self.speciality),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.time.is_none() && self.speciality.is_none()
    }

    /// Path placeholders the filter endpoint expects for absent values.
    pub fn path_segments(&self) -> [&str; 3] {
        [
            self.name.as_deref().unwrap_or("null"),
            self.time.as_deref().unwrap_or("all"),
            self.speciality.as_deref().unwrap_or("all"),
        ]
    }
}

/// Admin create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub speciality: String,
    #[serde(default)]
    pub available_times: Vec<String>,
}

impl DoctorForm {
    pub fn validate(&self) -> Result<(), DoctorError> {
        if self.name.trim().is_empty() {
            return Err(DoctorError::ValidationError("Doctor name is required".to_string()));
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(DoctorError::ValidationError("A valid email is required".to_string()));
        }
        if self.speciality.trim().is_empty() {
            return Err(DoctorError::ValidationError("Speciality is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DoctorError {
    #[error("Doctor details not found")]
    NotFound(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn speciality_aliases_collapse_to_one_field() {
        let a: Doctor = serde_json::from_value(json!({"id": 1, "specialization": "Dermatology"})).unwrap();
        let b: Doctor = serde_json::from_value(json!({"id": 2, "speciality": "Dermatology"})).unwrap();
        let c: Doctor = serde_json::from_value(json!({"id": 3, "specialty": "Dermatology"})).unwrap();

        for doctor in [a, b, c] {
            assert_eq!(doctor.speciality.as_deref(), Some("Dermatology"));
        }
    }

    #[test]
    fn both_speciality_spellings_present_prefers_canonical() {
        let doctor: Doctor = serde_json::from_value(json!({
            "id": 1, "speciality": "Cardiology", "specialization": "Oncology"
        }))
        .unwrap();
        assert_eq!(doctor.speciality.as_deref(), Some("Cardiology"));
    }

    #[test]
    fn missing_fields_default() {
        let doctor: Doctor = serde_json::from_value(json!({"id": 4, "availableTimes": null})).unwrap();
        assert!(doctor.available_times.is_empty());
        assert_eq!(doctor.display_name(), "Unknown");
        assert_eq!(doctor.display_speciality(), "General");
        assert_eq!(doctor.phone, None);
    }

    #[test]
    fn filter_placeholders() {
        let filter = DoctorFilter::new(Some("  "), Some("AM"), None);
        assert_eq!(filter.path_segments(), ["null", "AM", "all"]);
        assert!(!filter.is_empty());
        assert!(DoctorFilter::new(Some(""), None, Some(" ")).is_empty());
    }

    #[test]
    fn form_validation() {
        let mut form = DoctorForm {
            name: "Dr. Who".into(),
            email: "who@clinic.test".into(),
            phone: "555".into(),
            speciality: "General".into(),
            ..Default::default()
        };
        assert!(form.validate().is_ok());

        form.email = "nope".into();
        assert!(form.validate().is_err());
    }
}
