// libs/appointment-cell/src/services/booking.rs
use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info, warn};

use doctor_cell::Doctor;
use patient_cell::Patient;
use shared_models::{Notice, Notifier};

use crate::models::{Appointment, AppointmentStatus, AppointmentSubmission, BookingError, EntityRef};
use crate::services::appointment::AppointmentGateway;

/// Everything the booking overlay shows and submits. Captured when the
/// overlay opens; later directory refreshes do not affect it.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub speciality: String,
    pub patient_id: i64,
    pub patient_name: String,
    pub patient_email: Option<String>,
    pub slots: Vec<String>,
    /// Earliest selectable date.
    pub min_date: NaiveDate,
}

impl BookingForm {
    pub fn new(doctor: &Doctor, patient: &Patient, today: NaiveDate) -> Self {
        Self {
            doctor_id: doctor.id,
            doctor_name: doctor.display_name().to_string(),
            speciality: doctor.display_speciality().to_string(),
            patient_id: patient.id,
            patient_name: patient.display_name().to_string(),
            patient_email: patient.email.clone(),
            slots: doctor.available_times.clone(),
            min_date: today,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open(BookingForm),
    Submitting(BookingForm),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Booked,
    /// Rejected locally; no request was sent.
    Rejected(BookingError),
    /// The server refused or could not be reached; overlay stays open.
    Failed(String),
}

/// Modal booking flow: Closed -> Open -> Submitting -> Closed on success,
/// back to Open on failure.
#[derive(Debug, Default)]
pub struct BookingOverlay {
    state: OverlayState,
}

impl BookingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, OverlayState::Closed)
    }

    pub fn form(&self) -> Option<&BookingForm> {
        match &self.state {
            OverlayState::Open(form) | OverlayState::Submitting(form) => Some(form),
            OverlayState::Closed => None,
        }
    }

    /// Open for `doctor`. A second open while one is showing is ignored.
    pub fn open(&mut self, doctor: &Doctor, patient: &Patient, today: NaiveDate) -> bool {
        if self.is_open() {
            debug!("Booking overlay already open; ignoring open for doctor {}", doctor.id);
            return false;
        }
        self.state = OverlayState::Open(BookingForm::new(doctor, patient, today));
        true
    }

    pub fn close(&mut self) {
        self.state = OverlayState::Closed;
    }

    pub async fn submit<G>(
        &mut self,
        gateway: &G,
        token: &str,
        date: &str,
        time: &str,
        notifier: &dyn Notifier,
    ) -> SubmitOutcome
    where
        G: AppointmentGateway + ?Sized,
    {
        let form = match &self.state {
            OverlayState::Open(form) => form.clone(),
            _ => return SubmitOutcome::Rejected(BookingError::NotOpen),
        };

        let appointment_date = match validate_selection(&form, date, time) {
            Ok(appointment_date) => appointment_date,
            Err(err) => {
                notifier.notify(Notice::warning(err.to_string()));
                return SubmitOutcome::Rejected(err);
            }
        };

        let submission = AppointmentSubmission {
            id: None,
            doctor: EntityRef { id: form.doctor_id },
            patient: EntityRef { id: form.patient_id },
            appointment_date,
            status: AppointmentStatus::Pending.code(),
        };

        self.state = OverlayState::Submitting(form.clone());

        match gateway.book(&submission, token).await {
            Ok(outcome) if outcome.success => {
                info!("Appointment booked with doctor {}", form.doctor_id);
                self.state = OverlayState::Closed;
                notifier.notify(Notice::success("Appointment booked successfully!"));
                SubmitOutcome::Booked
            }
            Ok(outcome) => {
                let message = format!("Booking failed: {}", outcome.message_or("Please try again"));
                warn!("{}", message);
                self.state = OverlayState::Open(form);
                notifier.notify(Notice::error(message.clone()));
                SubmitOutcome::Failed(message)
            }
            Err(err) => {
                warn!("Booking request failed: {}", err);
                self.state = OverlayState::Open(form);
                let message = "System error: could not book appointment".to_string();
                notifier.notify(Notice::error(message.clone()));
                SubmitOutcome::Failed(message)
            }
        }
    }
}

fn validate_selection(form: &BookingForm, date: &str, time: &str) -> Result<String, BookingError> {
    let (date, time) = (date.trim(), time.trim());
    if date.is_empty() || time.is_empty() {
        return Err(BookingError::MissingSelection);
    }
    if !form.slots.iter().any(|slot| slot.trim() == time) {
        return Err(BookingError::UnknownSlot(time.to_string()));
    }
    compose_checked(date, time, form.min_date)
}

fn compose_checked(date: &str, slot: &str, min_date: NaiveDate) -> Result<String, BookingError> {
    let day = parse_day(date)?;
    if day < min_date {
        return Err(BookingError::DateInPast);
    }
    compose_appointment_date(date, slot)
}

fn parse_day(date: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| BookingError::InvalidDate(date.to_string()))
}

/// Combine a calendar date and a slot label such as `"09:00 - 10:00"` into
/// `YYYY-MM-DDTHH:MM:SS`, using the slot's start time.
pub fn compose_appointment_date(date: &str, slot: &str) -> Result<String, BookingError> {
    let day = parse_day(date)?;

    let start = slot.split('-').next().map(str::trim).unwrap_or_default();
    let time = NaiveTime::parse_from_str(start, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(start, "%H:%M"))
        .map_err(|_| BookingError::InvalidSlot(slot.to_string()))?;

    Ok(day.and_time(time).format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Move an existing pending appointment to a new date and slot.
pub async fn reschedule_appointment<G>(
    gateway: &G,
    appointment: &Appointment,
    date: &str,
    slot: &str,
    today: NaiveDate,
    token: &str,
    notifier: &dyn Notifier,
) -> Result<bool, BookingError>
where
    G: AppointmentGateway + ?Sized,
{
    if !appointment.status.is_actionable() {
        debug!("Refusing to reschedule appointment {} in status {}", appointment.id, appointment.status.label);
        notifier.notify(Notice::warning("Only pending appointments can be rescheduled"));
        return Ok(false);
    }

    if date.trim().is_empty() || slot.trim().is_empty() {
        notifier.notify(Notice::warning(BookingError::MissingSelection.to_string()));
        return Err(BookingError::MissingSelection);
    }

    let appointment_date = match compose_checked(date, slot, today) {
        Ok(appointment_date) => appointment_date,
        Err(err) => {
            notifier.notify(Notice::warning(err.to_string()));
            return Err(err);
        }
    };

    let (Some(doctor_id), Some(patient_id)) = (appointment.doctor_id, appointment.patient_id) else {
        notifier.notify(Notice::error("Appointment is missing doctor or patient details"));
        return Ok(false);
    };

    let submission = AppointmentSubmission {
        id: Some(appointment.id),
        doctor: EntityRef { id: doctor_id },
        patient: EntityRef { id: patient_id },
        appointment_date,
        status: AppointmentStatus::Pending.code(),
    };

    match gateway.update(&submission, token).await {
        Ok(outcome) if outcome.success => {
            notifier.notify(Notice::success(outcome.message_or("Appointment rescheduled")));
            Ok(true)
        }
        Ok(outcome) => {
            notifier.notify(Notice::error(format!(
                "Reschedule failed: {}",
                outcome.message_or("Please try again")
            )));
            Ok(false)
        }
        Err(err) => {
            warn!("Reschedule request failed: {}", err);
            notifier.notify(Notice::error(err.user_message()));
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_from_slot_start() {
        assert_eq!(
            compose_appointment_date("2025-06-01", "09:00 - 10:00").unwrap(),
            "2025-06-01T09:00:00"
        );
        assert_eq!(compose_appointment_date("2025-06-01", "9:30").unwrap(), "2025-06-01T09:30:00");
        assert_eq!(
            compose_appointment_date("2025-06-01", "14:15:30").unwrap(),
            "2025-06-01T14:15:30"
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            compose_appointment_date("06/01/2025", "09:00"),
            Err(BookingError::InvalidDate("06/01/2025".into()))
        );
        assert_eq!(
            compose_appointment_date("2025-06-01", "morning"),
            Err(BookingError::InvalidSlot("morning".into()))
        );
    }

    fn form() -> BookingForm {
        BookingForm {
            doctor_id: 10,
            doctor_name: "Alice Smith".into(),
            speciality: "Cardiology".into(),
            patient_id: 20,
            patient_name: "Pat Doe".into(),
            patient_email: None,
            slots: vec!["09:00 - 10:00".into()],
            min_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        }
    }

    #[test]
    fn selection_guards() {
        let form = form();
        assert_eq!(validate_selection(&form, "", "09:00 - 10:00"), Err(BookingError::MissingSelection));
        assert_eq!(validate_selection(&form, "2025-06-02", " "), Err(BookingError::MissingSelection));
        assert_eq!(
            validate_selection(&form, "2025-06-02", "11:00 - 12:00"),
            Err(BookingError::UnknownSlot("11:00 - 12:00".into()))
        );
        assert_eq!(validate_selection(&form, "2025-05-31", "09:00 - 10:00"), Err(BookingError::DateInPast));
        assert_eq!(
            validate_selection(&form, "2025-06-01", "09:00 - 10:00").unwrap(),
            "2025-06-01T09:00:00"
        );
    }
}
