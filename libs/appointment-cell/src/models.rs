// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::services::status::{normalize_status, NormalizedStatus};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// Canonical appointment status, independent of wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Integer code used on the wire: 0, 1, 2.
    pub fn code(&self) -> u8 {
        match self {
            AppointmentStatus::Pending => 0,
            AppointmentStatus::Completed => 1,
            AppointmentStatus::Cancelled => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawStatus {
    Code(i64),
    Name(String),
    Other(Value),
}

impl Default for RawStatus {
    fn default() -> Self {
        RawStatus::Other(Value::Null)
    }
}

impl fmt::Display for RawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawStatus::Code(code) => write!(f, "{}", code),
            RawStatus::Name(name) => f.write_str(name),
            RawStatus::Other(Value::Null) => Ok(()),
            RawStatus::Other(value) => write!(f, "{}", value),
        }
    }
}

/// One scheduled consultation, normalized from either wire shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawAppointment")]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub doctor_name: Option<String>,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub patient_phone: Option<String>,
    /// Wall-clock start; `None` when the server value could not be parsed.
    pub appointment_date: Option<NaiveDateTime>,
    pub status: NormalizedStatus,
}

impl Appointment {
    pub fn doctor_display_name(&self) -> &str {
        non_blank(self.doctor_name.as_deref()).unwrap_or("Unknown")
    }

    pub fn patient_display_name(&self) -> &str {
        non_blank(self.patient_name.as_deref()).unwrap_or("Unknown")
    }

    pub fn canonical_status(&self) -> Option<AppointmentStatus> {
        self.status.canonical
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.canonical == Some(AppointmentStatus::Cancelled)
    }
}

// Every raw field is read through `Value` so that one badly typed field
// degrades to `None` instead of rejecting the whole appointment list.
#[derive(Debug, Default, Deserialize)]
struct PartyRef {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAppointment {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<i64>,
    #[serde(default, rename = "appointment_id", deserialize_with = "lenient_id")]
    legacy_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    doctor_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    patient_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    doctor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    patient_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    patient_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    patient_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_party")]
    doctor: Option<PartyRef>,
    #[serde(default, deserialize_with = "lenient_party")]
    patient: Option<PartyRef>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    appointment_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    appointment_date: Option<NaiveDateTime>,
    #[serde(default)]
    status: RawStatus,
}

impl From<RawAppointment> for Appointment {
    fn from(raw: RawAppointment) -> Self {
        let doctor = raw.doctor.unwrap_or_default();
        let patient = raw.patient.unwrap_or_default();

        Self {
            id: raw.id.or(raw.legacy_id).unwrap_or_default(),
            doctor_id: raw.doctor_id.or(doctor.id),
            patient_id: raw.patient_id.or(patient.id),
            doctor_name: raw.doctor_name.or(doctor.name),
            patient_name: raw.patient_name.or(patient.name),
            patient_email: raw.patient_email.or(patient.email),
            patient_phone: raw.patient_phone.or(patient.phone),
            appointment_date: raw.appointment_time.or(raw.appointment_date),
            status: normalize_status(&raw.status),
        }
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_party<'de, D>(deserializer: D) -> Result<Option<PartyRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::String(s) => parse_appointment_date(s),
        Value::Array(parts) => timestamp_from_parts(parts),
        _ => None,
    })
}

// `[year, month, day, hour?, minute?, second?, nanos?]`, as Java backends
// serialize `LocalDateTime`.
fn timestamp_from_parts(parts: &[Value]) -> Option<NaiveDateTime> {
    let nums: Vec<i64> = parts.iter().map(Value::as_i64).collect::<Option<_>>()?;
    if nums.len() < 3 {
        return None;
    }
    let part = |i: usize| nums.get(i).copied().unwrap_or(0);

    let date = NaiveDate::from_ymd_opt(
        i32::try_from(part(0)).ok()?,
        u32::try_from(part(1)).ok()?,
        u32::try_from(part(2)).ok()?,
    )?;
    date.and_hms_nano_opt(
        u32::try_from(part(3)).ok()?,
        u32::try_from(part(4)).ok()?,
        u32::try_from(part(5)).ok()?,
        u32::try_from(part(6)).ok()?,
    )
}

/// Parse a server timestamp as wall-clock time. Accepts ISO-8601 without
/// zone, RFC 3339 (offset dropped), and a bare date (midnight).
pub fn parse_appointment_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    pub id: i64,
}

/// Body of a booking or reschedule request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSubmission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub doctor: EntityRef,
    pub patient: EntityRef,
    /// `YYYY-MM-DDTHH:MM:SS`, no zone.
    pub appointment_date: String,
    pub status: u8,
}

/// Doctor dashboard query: one calendar day, optional patient name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub date: NaiveDate,
    pub patient_name: Option<String>,
}

impl ScheduleQuery {
    pub fn new(date: NaiveDate, patient_name: Option<&str>) -> Self {
        Self {
            date,
            patient_name: patient_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatientAppointmentsResponse {
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Booking form is not open")]
    NotOpen,

    #[error("Please select both date and time")]
    MissingSelection,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Please choose a date from today onward")]
    DateInPast,

    #[error("The selected time is not offered by this doctor: {0}")]
    UnknownSlot(String),

    #[error("Invalid time slot: {0}")]
    InvalidSlot(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    #[error("Appointment not found")]
    NotFound(i64),

    #[error("Appointment cannot be modified in current status: {0}")]
    InvalidStatusTransition(String),

    #[error("Appointments can only be marked completed or cancelled")]
    InvalidTarget,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use serde_json::json;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_time(NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap())
    }

    #[test]
    fn parses_summary_shape() {
        let appt: Appointment = serde_json::from_value(json!({
            "id": 5,
            "doctorId": 10,
            "doctorName": "Alice Smith",
            "patientId": 20,
            "patientName": "Pat Doe",
            "appointmentTime": "2025-06-01T09:00:00",
            "appointmentDate": "2025-06-01",
            "status": 0
        }))
        .unwrap();

        assert_eq!(appt.id, 5);
        assert_eq!(appt.doctor_id, Some(10));
        assert_eq!(appt.appointment_date, Some(at("2025-06-01", "09:00:00")));
        assert_eq!(appt.canonical_status(), Some(AppointmentStatus::Pending));
    }

    #[test]
    fn parses_entity_shape() {
        let appt: Appointment = serde_json::from_value(json!({
            "id": 6,
            "doctor": {"id": 10, "name": "Alice Smith"},
            "patient": {"id": 20, "name": "Pat Doe", "phone": "555"},
            "appointmentDate": "2025-06-01T14:30:00.000",
            "status": "COMPLETED"
        }))
        .unwrap();

        assert_eq!(appt.doctor_name.as_deref(), Some("Alice Smith"));
        assert_eq!(appt.patient_id, Some(20));
        assert_eq!(appt.patient_phone.as_deref(), Some("555"));
        assert_eq!(appt.appointment_date, Some(at("2025-06-01", "14:30:00")));
        assert_eq!(appt.canonical_status(), Some(AppointmentStatus::Completed));
    }

    #[test]
    fn missing_parties_fall_back_to_unknown() {
        let appt: Appointment = serde_json::from_value(json!({"id": 7, "status": 2})).unwrap();
        assert_eq!(appt.patient_display_name(), "Unknown");
        assert_eq!(appt.doctor_display_name(), "Unknown");
        assert_eq!(appt.appointment_date, None);
        assert!(appt.is_cancelled());
    }

    #[test]
    fn legacy_id_field_is_accepted() {
        let appt: Appointment = serde_json::from_value(json!({"appointment_id": 8})).unwrap();
        assert_eq!(appt.id, 8);
    }

    #[test]
    fn date_formats() {
        assert_eq!(parse_appointment_date("2025-06-01T09:00"), Some(at("2025-06-01", "09:00:00")));
        assert_eq!(parse_appointment_date("2025-06-01"), Some(at("2025-06-01", "00:00:00")));
        assert_eq!(
            parse_appointment_date("2025-06-01T09:00:00+02:00"),
            Some(at("2025-06-01", "09:00:00"))
        );
        assert_eq!(parse_appointment_date("next tuesday"), None);
        assert_eq!(parse_appointment_date(""), None);
    }

    #[test]
    fn unparsable_time_falls_back_to_date_field() {
        let appt: Appointment = serde_json::from_value(json!({
            "id": 9, "appointmentTime": "garbage", "appointmentDate": "2025-06-02"
        }))
        .unwrap();
        assert_eq!(appt.appointment_date, Some(at("2025-06-02", "00:00:00")));
    }

    #[test]
    fn badly_typed_fields_do_not_drop_the_list() {
        let list: Vec<Appointment> = serde_json::from_value(json!([
            {"id": 1, "doctorName": "Alice Smith", "appointmentTime": "2025-06-01T09:00:00", "status": 0},
            {"id": 2, "appointmentDate": {"when": "soon"}, "doctorName": 42, "patient": "Pat", "status": "PENDING"},
            {"id": "3", "patientId": [1], "appointmentDate": true}
        ]))
        .unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(list[0].appointment_date, Some(at("2025-06-01", "09:00:00")));
        assert_eq!(list[1].appointment_date, None);
        assert_eq!(list[1].doctor_name.as_deref(), Some("42"));
        assert_eq!(list[1].patient_display_name(), "Unknown");
        assert_eq!(list[2].id, 3);
        assert_eq!(list[2].patient_id, None);
    }

    #[test]
    fn array_timestamps_are_read() {
        let appt: Appointment = serde_json::from_value(json!({
            "id": 2, "appointmentDate": [2025, 6, 1, 9, 0], "status": 0
        }))
        .unwrap();
        assert_eq!(appt.appointment_date, Some(at("2025-06-01", "09:00:00")));

        let appt: Appointment = serde_json::from_value(json!({"id": 3, "appointmentDate": [2025, 13, 1]})).unwrap();
        assert_eq!(appt.appointment_date, None);
    }

    #[test]
    fn submission_wire_shape() {
        let submission = AppointmentSubmission {
            id: None,
            doctor: EntityRef { id: 10 },
            patient: EntityRef { id: 20 },
            appointment_date: "2025-06-01T09:00:00".into(),
            status: AppointmentStatus::Pending.code(),
        };

        assert_eq!(
            serde_json::to_value(&submission).unwrap(),
            json!({
                "doctor": {"id": 10},
                "patient": {"id": 20},
                "appointmentDate": "2025-06-01T09:00:00",
                "status": 0
            })
        );
    }

    #[test]
    fn schedule_query_blank_name_is_none() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(ScheduleQuery::new(date, Some("  ")).patient_name, None);
        assert_eq!(ScheduleQuery::new(date, Some(" Pat ")).patient_name.as_deref(), Some("Pat"));
    }
}
