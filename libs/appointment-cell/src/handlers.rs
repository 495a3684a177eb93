// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Form,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::{debug, info, warn};

use doctor_cell::{DoctorDirectory, DoctorFilter, DoctorService};
use patient_cell::{Patient, PatientError, PatientService};
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::{GatewayError, Notice, NoticeLog, Notifier, Role, Session};
use shared_utils::extractor::ConfirmForm;
use shared_utils::html::{render_confirmation, render_notices};
use shared_utils::Fragment;

use crate::models::{BookingError, RawStatus, ScheduleQuery, TransitionError};
use crate::render::render_booking_form;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::{
    normalize_status, AppointmentService, BookingOverlay, DoctorScheduleView, PatientAppointmentsView,
    SubmitOutcome, Tab,
};

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotFound(_) => AppError::NotFound(err.to_string()),
            TransitionError::InvalidStatusTransition(_) | TransitionError::InvalidTarget => {
                AppError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentListQuery {
    #[serde(default)]
    pub tab: Tab,
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SlotSelection {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleParams {
    pub date: Option<NaiveDate>,
    pub patient_name: Option<String>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn current_patient(config: &AppConfig, token: &str) -> Result<Patient, AppError> {
    PatientService::new(config).get_profile(token).await.map_err(|err: GatewayError| {
        if err.is_unauthorized() {
            return AppError::Gateway(err);
        }
        warn!("Patient profile unavailable: {}", err);
        AppError::Internal(PatientError::ProfileUnavailable.to_string())
    })
}

async fn patient_view(
    config: &AppConfig,
    service: &AppointmentService,
    token: &str,
) -> Result<PatientAppointmentsView, AppError> {
    let patient = current_patient(config, token).await?;
    let mut view = PatientAppointmentsView::new(patient.id);
    view.load(service, token).await?;
    Ok(view)
}

/// Patient's appointments for one tab, optionally filtered by doctor name.
pub async fn patient_appointments(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Fragment, AppError> {
    let token = session.require_role(Role::LoggedPatient)?;
    let service = AppointmentService::new(&config);
    let view = patient_view(&config, &service, token).await?;

    Ok(view.render(query.tab, query.search.as_deref(), Local::now().naive_local()))
}

pub async fn next_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
) -> Result<Fragment, AppError> {
    let token = session.require_role(Role::LoggedPatient)?;
    let service = AppointmentService::new(&config);
    let view = patient_view(&config, &service, token).await?;

    Ok(view.render_next(Local::now().naive_local()))
}

pub async fn cancel_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(appointment_id): Path<i64>,
    Form(confirm): Form<ConfirmForm>,
) -> Result<Fragment, AppError> {
    let token = session.require_role(Role::LoggedPatient)?;
    let confirmation = confirm.confirmation();
    if !confirmation.0 {
        return Ok(render_confirmation(
            "Are you sure you want to cancel this appointment?",
            &format!("/patient/appointments/{}/cancel", appointment_id),
        ));
    }

    let service = AppointmentService::new(&config);
    let mut view = patient_view(&config, &service, token).await?;

    let notices = NoticeLog::new();
    view.cancel(&service, appointment_id, token, &confirmation, &notices).await?;

    let mut page = render_notices(&notices.take());
    page.push(view.render(Tab::Upcoming, None, Local::now().naive_local()));
    Ok(page)
}

pub async fn reschedule_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(appointment_id): Path<i64>,
    Form(selection): Form<SlotSelection>,
) -> Result<Fragment, AppError> {
    let token = session.require_role(Role::LoggedPatient)?;
    let service = AppointmentService::new(&config);
    let mut view = patient_view(&config, &service, token).await?;

    let notices = NoticeLog::new();
    if let Err(err) = view
        .reschedule(&service, appointment_id, &selection.date, &selection.time, today(), token, &notices)
        .await
    {
        debug!("Reschedule of appointment {} refused: {}", appointment_id, err);
    }

    let mut page = render_notices(&notices.take());
    page.push(view.render(Tab::Upcoming, None, Local::now().naive_local()));
    Ok(page)
}

async fn open_overlay(
    config: &AppConfig,
    token: &str,
    doctor_id: i64,
    notifier: &dyn Notifier,
) -> Result<(BookingOverlay, Patient), AppError> {
    let mut directory = DoctorDirectory::new();
    directory.load(&DoctorService::new(config), &DoctorFilter::default()).await?;
    let doctor = directory.book_target(doctor_id, notifier)?;

    let patient = current_patient(config, token).await?;
    let mut overlay = BookingOverlay::new();
    overlay.open(doctor, &patient, today());
    Ok((overlay, patient))
}

/// Booking overlay for the doctor behind a "Book Appointment" click.
pub async fn booking_form(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<i64>,
) -> Result<Fragment, AppError> {
    let token = session.require_role(Role::LoggedPatient)?;
    let notices = NoticeLog::new();
    let (overlay, _) = open_overlay(&config, token, doctor_id, &notices).await?;

    Ok(overlay.form().map(render_booking_form).unwrap_or_default())
}

pub async fn book_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<i64>,
    Form(selection): Form<SlotSelection>,
) -> Result<Fragment, AppError> {
    let token = session.require_role(Role::LoggedPatient)?;
    let notices = NoticeLog::new();
    let (mut overlay, patient) = open_overlay(&config, token, doctor_id, &notices).await?;

    let service = AppointmentService::new(&config);
    let outcome = overlay
        .submit(&service, token, &selection.date, &selection.time, &notices)
        .await;

    let body = match outcome {
        SubmitOutcome::Booked => {
            info!("Patient {} booked doctor {}", patient.id, doctor_id);
            let mut view = PatientAppointmentsView::new(patient.id);
            match view.load(&service, token).await {
                Ok(()) => view.render_next(Local::now().naive_local()),
                Err(err) => {
                    warn!("Refreshing upcoming summary failed: {}", err);
                    Fragment::empty()
                }
            }
        }
        SubmitOutcome::Rejected(_) | SubmitOutcome::Failed(_) => {
            overlay.form().map(render_booking_form).unwrap_or_default()
        }
    };

    let mut page = render_notices(&notices.take());
    page.push(body);
    Ok(page)
}

/// Doctor's schedule for a day; defaults to today.
pub async fn doctor_schedule(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Query(params): Query<ScheduleParams>,
) -> Result<Fragment, AppError> {
    let token = session.require_role(Role::Doctor)?;
    let service = AppointmentService::new(&config);

    let query = ScheduleQuery::new(params.date.unwrap_or_else(today), params.patient_name.as_deref());
    let mut view = DoctorScheduleView::new(query);
    view.load(&service, token).await?;

    Ok(view.render())
}

pub async fn change_status(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path((appointment_id, status)): Path<(i64, String)>,
    Query(params): Query<ScheduleParams>,
    Form(confirm): Form<ConfirmForm>,
) -> Result<Fragment, AppError> {
    let token = session.require_role(Role::Doctor)?;

    let target = normalize_status(&RawStatus::Name(status.clone()))
        .canonical
        .ok_or_else(|| AppError::BadRequest(format!("Unknown status: {}", status)))?;

    let confirmation = confirm.confirmation();
    if !confirmation.0 {
        return Ok(render_confirmation(
            AppointmentLifecycleService::new().confirmation_prompt(target),
            &format!("/doctor/appointments/{}/status/{}", appointment_id, target.code()),
        ));
    }

    let service = AppointmentService::new(&config);
    let query = ScheduleQuery::new(params.date.unwrap_or_else(today), params.patient_name.as_deref());
    let mut view = DoctorScheduleView::new(query);
    view.load(&service, token).await?;

    let notices = NoticeLog::new();
    if let Err(err) = view
        .change_status(&service, appointment_id, target, token, &confirmation, &notices)
        .await
    {
        notices.notify(Notice::warning(err.to_string()));
    }

    let mut page = render_notices(&notices.take());
    page.push(view.render());
    Ok(page)
}
