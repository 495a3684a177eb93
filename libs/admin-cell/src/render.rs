use patient_cell::Patient;
use shared_utils::html::{escape, text_or, Fragment, NOT_AVAILABLE};

use crate::models::DashboardStats;

pub fn render_stats(stats: &DashboardStats) -> Fragment {
    Fragment::trusted(format!(
        concat!(
            r#"<div class="stats-grid">"#,
            r#"<div class="stat-card"><span class="stat-value">{doctors}</span><span class="stat-label">Doctors</span></div>"#,
            r#"<div class="stat-card"><span class="stat-value">{patients}</span><span class="stat-label">Patients</span></div>"#,
            r#"<div class="stat-card"><span class="stat-value">{appointments}</span><span class="stat-label">Appointments</span></div>"#,
            r#"</div>"#
        ),
        doctors = stats.doctors,
        patients = stats.patients,
        appointments = stats.appointments,
    ))
}

pub fn render_patient_rows(patients: &[Patient]) -> Fragment {
    if patients.is_empty() {
        return Fragment::trusted(r#"<tr><td colspan="4">No patients found.</td></tr>"#);
    }

    patients
        .iter()
        .map(|patient| {
            Fragment::trusted(format!(
                r#"<tr data-id="{}"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                patient.id,
                escape(patient.display_name()),
                text_or(patient.email.as_deref(), NOT_AVAILABLE),
                text_or(patient.phone.as_deref(), NOT_AVAILABLE),
                text_or(patient.address.as_deref(), NOT_AVAILABLE),
            ))
        })
        .collect()
}
