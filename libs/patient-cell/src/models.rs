use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Patient {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown")
    }

    /// Greeting name shown in the dashboard header.
    pub fn first_name(&self) -> &str {
        self.display_name().split_whitespace().next().unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatientProfileResponse {
    pub patient: Option<Patient>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatientError {
    #[error("Could not fetch your details")]
    ProfileUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_fall_back() {
        let patient: Patient = serde_json::from_value(json!({"id": 3})).unwrap();
        assert_eq!(patient.display_name(), "Unknown");

        let patient: Patient = serde_json::from_value(json!({"id": 3, "name": "Pat  Doe"})).unwrap();
        assert_eq!(patient.first_name(), "Pat");
    }
}
