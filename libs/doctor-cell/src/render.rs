use shared_models::Role;
use shared_utils::html::{escape, text_or, Fragment, NOT_AVAILABLE};

use crate::models::Doctor;

/// Doctor card for the given viewer. Action buttons carry the doctor id as a
/// data attribute; handlers resolve the doctor from the current directory.
pub fn render_doctor_card(doctor: &Doctor, viewer: Role) -> Fragment {
    let slots = if doctor.available_times.is_empty() {
        r#"<span class="no-times">No times available</span>"#.to_string()
    } else {
        doctor
            .available_times
            .iter()
            .map(|t| format!(r#"<span class="time-chip">{}</span>"#, escape(t)))
            .collect()
    };

    let actions = match viewer {
        Role::Admin => format!(
            concat!(
                r#"<div class="doctor-card-actions">"#,
                r#"<button type="button" class="btn-edit" data-action="edit-doctor" data-doctor-id="{id}">Edit</button>"#,
                r#"<button type="button" class="btn-delete" data-action="delete-doctor" data-doctor-id="{id}">Delete</button>"#,
                r#"</div>"#
            ),
            id = doctor.id
        ),
        Role::LoggedPatient => format!(
            concat!(
                r#"<div class="doctor-card-actions">"#,
                r#"<button type="button" class="btn-book book-appointment-btn" data-action="book" data-doctor-id="{id}">Book Appointment</button>"#,
                r#"</div>"#
            ),
            id = doctor.id
        ),
        _ => String::new(),
    };

    Fragment::trusted(format!(
        concat!(
            r#"<div class="doctor-card" data-doctor-id="{id}">"#,
            r#"<div class="doctor-card-header"><div class="doctor-card-title">"#,
            r#"<h3>{name}</h3><span class="specialty-badge">{speciality}</span>"#,
            r#"</div></div>"#,
            r#"<div class="doctor-card-body">"#,
            r#"<div class="doctor-info-row"><span class="doctor-email">{email}</span></div>"#,
            r#"<div class="doctor-info-row"><span class="doctor-phone">{phone}</span></div>"#,
            r#"<div class="availability-section"><div class="availability-header"><strong>Available Times</strong></div>"#,
            r#"<div class="time-slots">{slots}</div></div>"#,
            r#"</div>{actions}</div>"#
        ),
        id = doctor.id,
        name = escape(doctor.display_name()),
        speciality = escape(doctor.display_speciality()),
        email = text_or(doctor.email.as_deref(), NOT_AVAILABLE),
        phone = text_or(doctor.phone.as_deref(), NOT_AVAILABLE),
        slots = slots,
        actions = actions,
    ))
}

pub fn render_doctor_cards(doctors: &[Doctor], viewer: Role) -> Fragment {
    if doctors.is_empty() {
        return Fragment::trusted(r#"<p class="no-results">No doctors found.</p>"#);
    }

    doctors.iter().map(|d| render_doctor_card(d, viewer)).collect()
}
