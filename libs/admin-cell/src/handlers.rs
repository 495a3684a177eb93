use std::sync::Arc;

use axum::extract::{Extension, State};
use tracing::warn;

use appointment_cell::render::render_appointment_overview;
use appointment_cell::{AppointmentGateway, AppointmentService};
use patient_cell::PatientService;
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::{Notice, Role, Session};
use shared_utils::html::render_notices;
use shared_utils::Fragment;

use crate::render::{render_patient_rows, render_stats};
use crate::services::AdminService;

/// Admin dashboard: counts, every appointment, every patient. The three
/// requests run concurrently; a failed listing degrades to a notice.
pub async fn overview(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
) -> Result<Fragment, AppError> {
    let token = session.require_role(Role::Admin)?;

    let admin = AdminService::new(&config);
    let appointments = AppointmentService::new(&config);
    let patients = PatientService::new(&config);

    let (stats, appointments, patients) = tokio::join!(
        admin.dashboard_stats(token),
        appointments.all_appointments(token),
        patients.all_patients(token),
    );

    let stats = stats?;
    let mut page = render_stats(&stats);

    match appointments {
        Ok(appointments) => page.push(render_appointment_overview(&appointments)),
        Err(err) => {
            warn!("Loading all appointments failed: {}", err);
            page.push(render_notices(&[Notice::error(err.user_message())]));
        }
    }

    match patients {
        Ok(patients) => page.push(Fragment::trusted(format!(
            r#"<table class="patient-table"><tbody>{}</tbody></table>"#,
            render_patient_rows(&patients)
        ))),
        Err(err) => {
            warn!("Loading all patients failed: {}", err);
            page.push(render_notices(&[Notice::error(err.user_message())]));
        }
    }

    Ok(page)
}
