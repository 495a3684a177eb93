use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::models::Appointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Upcoming,
    Past,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Upcoming => "upcoming",
            Tab::Past => "past",
        }
    }
}

/// Whose name the search box matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counterpart {
    /// Patient viewing their own appointments searches by doctor.
    Doctor,
    /// Doctor viewing a schedule searches by patient.
    Patient,
}

impl Counterpart {
    fn name_of<'a>(&self, appointment: &'a Appointment) -> &'a str {
        match self {
            Counterpart::Doctor => appointment.doctor_display_name(),
            Counterpart::Patient => appointment.patient_display_name(),
        }
    }
}

/// Upcoming means at or after `now` and not cancelled. Everything else,
/// including appointments with an unreadable date, is past.
pub fn is_upcoming(appointment: &Appointment, now: NaiveDateTime) -> bool {
    match appointment.appointment_date {
        Some(date) => date >= now && !appointment.is_cancelled(),
        None => false,
    }
}

// The summary card only counts appointments that have not started yet.
fn starts_after(appointment: &Appointment, now: NaiveDateTime) -> bool {
    match appointment.appointment_date {
        Some(date) => date > now && !appointment.is_cancelled(),
        None => false,
    }
}

/// Partition by tab, filter by counterpart name, and order the result.
/// Upcoming is soonest first; past is most recent first with undated
/// entries last. Ties keep server order.
pub fn select_appointments<'a>(
    appointments: &'a [Appointment],
    tab: Tab,
    search: Option<&str>,
    now: NaiveDateTime,
    counterpart: Counterpart,
) -> Vec<&'a Appointment> {
    let needle = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut selected: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| (tab == Tab::Upcoming) == is_upcoming(a, now))
        .filter(|a| match &needle {
            Some(needle) => counterpart.name_of(a).to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .collect();

    selected.sort_by(|a, b| match tab {
        Tab::Upcoming => compare_dates(a, b),
        Tab::Past => compare_dates(b, a),
    });

    selected
}

// `None` sorts before any date, so a descending sort puts undated entries last.
fn compare_dates(a: &Appointment, b: &Appointment) -> Ordering {
    a.appointment_date.cmp(&b.appointment_date)
}

/// Soonest non-cancelled appointment strictly after `now`.
pub fn next_upcoming(appointments: &[Appointment], now: NaiveDateTime) -> Option<&Appointment> {
    appointments
        .iter()
        .filter(|a| starts_after(a, now))
        .min_by_key(|a| a.appointment_date)
}
