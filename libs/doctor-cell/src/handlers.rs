use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Form,
};
use serde::Deserialize;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::{Notice, NoticeLog, Notifier, Role, Session};
use shared_utils::extractor::ConfirmForm;
use shared_utils::html::{render_confirmation, render_notices};
use shared_utils::Fragment;

use crate::models::{DoctorError, DoctorFilter, DoctorForm};
use crate::services::{DoctorDirectory, DoctorService};

/// Admin form fields; slots arrive as one comma or newline separated field.
#[derive(Debug, Deserialize)]
pub struct DoctorFormInput {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: Option<String>,
    pub speciality: String,
    #[serde(default)]
    pub available_times: String,
}

impl From<DoctorFormInput> for DoctorForm {
    fn from(input: DoctorFormInput) -> Self {
        let available_times = input
            .available_times
            .split(|c| c == ',' || c == '\n')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        DoctorForm {
            id: input.id,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            password: input.password.filter(|p| !p.is_empty()),
            speciality: input.speciality.trim().to_string(),
            available_times,
        }
    }
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound(_) => AppError::NotFound(err.to_string()),
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
        }
    }
}

/// Doctor directory for the current viewer, optionally filtered.
pub async fn list_doctors(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Query(filter): Query<DoctorFilter>,
) -> Result<Fragment, AppError> {
    let service = DoctorService::new(&config);
    let mut directory = DoctorDirectory::new();

    directory.load(&service, &filter.normalized()).await?;

    Ok(directory.render(session.role))
}

/// Anonymous landing page: the unfiltered directory without actions.
pub async fn landing(State(config): State<Arc<AppConfig>>) -> Result<Fragment, AppError> {
    let service = DoctorService::new(&config);
    let mut directory = DoctorDirectory::new();

    directory.load(&service, &DoctorFilter::default()).await?;

    Ok(directory.render(Role::Anonymous))
}

pub async fn save_doctor(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Form(input): Form<DoctorFormInput>,
) -> Result<Fragment, AppError> {
    let token = session.require_role(Role::Admin)?;
    let form = DoctorForm::from(input);
    form.validate()?;

    let service = DoctorService::new(&config);
    let outcome = if form.id.is_some() {
        service.update_doctor(&form, token).await?
    } else {
        service.save_doctor(&form, token).await?
    };

    let notices = NoticeLog::new();
    if outcome.success {
        notices.notify(Notice::success(outcome.message_or("Doctor saved successfully")));
    } else {
        notices.notify(Notice::error(format!(
            "Failed to save doctor: {}",
            outcome.message_or("Unknown error")
        )));
    }

    Ok(render_notices(&notices.take()))
}

pub async fn delete_doctor(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<i64>,
    Form(confirm): Form<ConfirmForm>,
) -> Result<Fragment, AppError> {
    let token = session.require_role(Role::Admin)?;
    let service = DoctorService::new(&config);
    let mut directory = DoctorDirectory::new();
    directory.load(&service, &DoctorFilter::default()).await?;

    let confirmation = confirm.confirmation();
    if !confirmation.0 {
        let doctor = directory.find(doctor_id).ok_or(DoctorError::NotFound(doctor_id))?;
        return Ok(render_confirmation(
            &format!("Are you sure you want to delete Dr. {}?", doctor.display_name()),
            &format!("/doctors/{}/delete", doctor_id),
        ));
    }

    let notices = NoticeLog::new();
    directory
        .delete_doctor(&service, doctor_id, token, &confirmation, &notices)
        .await?;

    let mut page = render_notices(&notices.take());
    page.push(directory.render(session.role));
    Ok(page)
}
