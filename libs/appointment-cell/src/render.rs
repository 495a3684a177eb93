use shared_models::Role;
use shared_utils::html::{escape, text_or, Fragment, NOT_AVAILABLE};

use crate::models::{Appointment, AppointmentStatus};
use crate::services::booking::BookingForm;
use crate::services::selection::Tab;

/// Where a card is shown; decides whether controls may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardContext {
    Tab(Tab),
    /// Doctor's working schedule for a day. Any pending appointment on it
    /// keeps its controls whatever its time, so a doctor can still close
    /// out earlier slots of the day.
    Schedule,
    /// Read-only listings such as the admin overview.
    Overview,
}

fn display_date(appointment: &Appointment) -> (String, String) {
    match appointment.appointment_date {
        Some(at) => (at.format("%a, %b %-d, %Y").to_string(), at.format("%H:%M").to_string()),
        None => ("TBD".to_string(), "TBD".to_string()),
    }
}

fn status_badge(appointment: &Appointment) -> String {
    format!(
        r#"<span class="status-badge status-{}">{}</span>"#,
        appointment.status.css_class,
        escape(&appointment.status.label)
    )
}

fn controls_allowed(appointment: &Appointment, context: CardContext) -> bool {
    appointment.status.is_actionable()
        && matches!(context, CardContext::Tab(Tab::Upcoming) | CardContext::Schedule)
}

fn actions(appointment: &Appointment, viewer: Role, context: CardContext) -> String {
    if !controls_allowed(appointment, context) {
        return String::new();
    }

    match viewer {
        Role::Doctor => format!(
            concat!(
                r#"<div class="appointment-actions">"#,
                r#"<button type="button" class="btn-complete" data-action="status" data-id="{id}" data-status="{completed}">Complete</button>"#,
                r#"<button type="button" class="btn-cancel" data-action="status" data-id="{id}" data-status="{cancelled}">Cancel</button>"#,
                r#"</div>"#
            ),
            id = appointment.id,
            completed = AppointmentStatus::Completed.code(),
            cancelled = AppointmentStatus::Cancelled.code(),
        ),
        Role::LoggedPatient => format!(
            concat!(
                r#"<div class="appointment-actions">"#,
                r#"<button type="button" class="btn-cancel" data-action="cancel" data-id="{id}">Cancel</button>"#,
                r#"<button type="button" class="btn-reschedule" data-action="reschedule" data-id="{id}">Reschedule</button>"#,
                r#"</div>"#
            ),
            id = appointment.id,
        ),
        _ => String::new(),
    }
}

/// One appointment card. The counterpart shown depends on the viewer.
pub fn render_appointment_card(appointment: &Appointment, viewer: Role, context: CardContext) -> Fragment {
    let (date, time) = display_date(appointment);

    let party = match viewer {
        Role::Doctor => format!(
            r#"<h3 class="appointment-patient">{}</h3>"#,
            escape(appointment.patient_display_name())
        ),
        Role::Admin => format!(
            r#"<h3 class="appointment-doctor">Dr. {}</h3><p class="appointment-patient">{}</p>"#,
            escape(appointment.doctor_display_name()),
            escape(appointment.patient_display_name())
        ),
        _ => format!(
            r#"<h3 class="appointment-doctor">Dr. {}</h3>"#,
            escape(appointment.doctor_display_name())
        ),
    };

    Fragment::trusted(format!(
        concat!(
            r#"<div class="appointment-card" data-id="{id}">"#,
            r#"<div class="appointment-card-header">{party}{badge}</div>"#,
            r#"<div class="appointment-card-body">"#,
            r#"<span class="appointment-date">{date}</span>"#,
            r#"<span class="appointment-time">{time}</span>"#,
            r#"</div>{actions}</div>"#
        ),
        id = appointment.id,
        party = party,
        badge = status_badge(appointment),
        date = escape(&date),
        time = escape(&time),
        actions = actions(appointment, viewer, context),
    ))
}

pub fn render_appointment_list(selected: &[&Appointment], tab: Tab, viewer: Role) -> Fragment {
    if selected.is_empty() {
        let book_now = match tab {
            Tab::Upcoming => r#" <a href="/" class="book-now-link">Book Now</a>"#,
            Tab::Past => "",
        };
        return Fragment::trusted(format!(
            r#"<p class="no-appointments">No {} appointments found.{}</p>"#,
            tab.as_str(),
            book_now
        ));
    }

    selected
        .iter()
        .map(|a| render_appointment_card(a, viewer, CardContext::Tab(tab)))
        .collect()
}

/// Table rows for the doctor's daily schedule.
pub fn render_schedule_rows(appointments: &[Appointment]) -> Fragment {
    if appointments.is_empty() {
        return Fragment::trusted(
            r#"<tr class="noPatientRecord"><td colspan="6">No Appointments found for today.</td></tr>"#,
        );
    }

    appointments
        .iter()
        .map(|appointment| {
            let (_, time) = display_date(appointment);
            Fragment::trusted(format!(
                concat!(
                    r#"<tr data-id="{id}">"#,
                    r#"<td>{patient_id}</td><td>{name}</td><td>{phone}</td><td>{email}</td>"#,
                    r#"<td>{time}</td><td>{badge}{actions}</td>"#,
                    r#"</tr>"#
                ),
                id = appointment.id,
                patient_id = appointment
                    .patient_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                name = escape(appointment.patient_display_name()),
                phone = text_or(appointment.patient_phone.as_deref(), NOT_AVAILABLE),
                email = text_or(appointment.patient_email.as_deref(), NOT_AVAILABLE),
                time = escape(&time),
                badge = status_badge(appointment),
                actions = actions(appointment, Role::Doctor, CardContext::Schedule),
            ))
        })
        .collect()
}

/// Read-only appointment listing for the admin overview.
pub fn render_appointment_overview(appointments: &[Appointment]) -> Fragment {
    if appointments.is_empty() {
        return Fragment::trusted(r#"<p class="no-appointments">No appointments found.</p>"#);
    }

    appointments
        .iter()
        .map(|a| render_appointment_card(a, Role::Admin, CardContext::Overview))
        .collect()
}

/// Summary card of the next appointment on the patient dashboard.
pub fn render_next_appointment(next: Option<&Appointment>) -> Fragment {
    let Some(appointment) = next else {
        return Fragment::trusted(r#"<div class="next-appointment empty"><p>No upcoming appointments.</p></div>"#);
    };

    let (date, time) = display_date(appointment);
    Fragment::trusted(format!(
        concat!(
            r#"<div class="next-appointment" data-id="{id}">"#,
            r#"<h4>Next Appointment</h4>"#,
            r#"<p class="next-doctor">Dr. {doctor}</p>"#,
            r#"<p class="next-when">{date} at {time}</p>"#,
            r#"</div>"#
        ),
        id = appointment.id,
        doctor = escape(appointment.doctor_display_name()),
        date = escape(&date),
        time = escape(&time),
    ))
}

/// Booking overlay: prefilled doctor and patient, date and slot inputs.
pub fn render_booking_form(form: &BookingForm) -> Fragment {
    let options: String = form
        .slots
        .iter()
        .map(|slot| format!(r#"<option value="{slot}">{slot}</option>"#, slot = escape(slot)))
        .collect();

    Fragment::trusted(format!(
        concat!(
            r#"<div class="modalApp" data-doctor-id="{doctor_id}">"#,
            r#"<h2>Book Appointment</h2>"#,
            r#"<form method="post" action="/patient/book/{doctor_id}">"#,
            r#"<input type="text" name="patient" value="{patient}" disabled>"#,
            r#"<input type="text" name="doctor" value="{doctor}" disabled>"#,
            r#"<input type="text" name="speciality" value="{speciality}" disabled>"#,
            r#"<input type="date" name="date" min="{min_date}" required>"#,
            r#"<select name="time" required><option value="">Select time</option>{options}</select>"#,
            r#"<button type="submit" class="confirm-booking">Confirm Booking</button>"#,
            r#"</form></div>"#
        ),
        doctor_id = form.doctor_id,
        patient = escape(&form.patient_name),
        doctor = escape(&form.doctor_name),
        speciality = escape(&form.speciality),
        min_date = form.min_date.format("%Y-%m-%d"),
        options = options,
    ))
}
