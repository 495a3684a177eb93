use tracing::{debug, warn};

use shared_models::{Confirmation, GatewayError, Notice, Notifier, Role};
use shared_utils::{Fragment, LoadGeneration, LoadTicket};

use crate::models::{Doctor, DoctorError, DoctorFilter};
use crate::render::render_doctor_cards;
use crate::services::doctor::DoctorService;

/// The in-memory doctor list behind a directory page. Click handlers look
/// doctors up here by id at click time, never from render-time captures.
#[derive(Debug, Default)]
pub struct DoctorDirectory {
    doctors: Vec<Doctor>,
    generation: LoadGeneration,
}

impl DoctorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation.begin()
    }

    /// Replace the list wholesale. Returns false when a newer load was issued
    /// after `ticket`, in which case the result is dropped.
    pub fn apply(&mut self, ticket: LoadTicket, doctors: Vec<Doctor>) -> bool {
        if !self.generation.is_current(ticket) {
            debug!("Discarding stale doctor list ({} entries)", doctors.len());
            return false;
        }
        self.doctors = doctors;
        true
    }

    pub async fn load(&mut self, service: &DoctorService, filter: &DoctorFilter) -> Result<(), GatewayError> {
        let ticket = self.begin_load();
        let doctors = service.search(filter).await?;
        self.apply(ticket, doctors);
        Ok(())
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn find(&self, doctor_id: i64) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == doctor_id)
    }

    /// Resolve the doctor behind a "Book" click.
    pub fn book_target(&self, doctor_id: i64, notifier: &dyn Notifier) -> Result<&Doctor, DoctorError> {
        self.find(doctor_id).ok_or_else(|| {
            warn!("Book click for unknown doctor {}", doctor_id);
            let err = DoctorError::NotFound(doctor_id);
            notifier.notify(Notice::error(err.to_string()));
            err
        })
    }

    pub fn render(&self, viewer: Role) -> Fragment {
        render_doctor_cards(&self.doctors, viewer)
    }

    /// Admin delete: confirm, call the API, drop the card on success.
    pub async fn delete_doctor(
        &mut self,
        service: &DoctorService,
        doctor_id: i64,
        token: &str,
        confirmation: &dyn Confirmation,
        notifier: &dyn Notifier,
    ) -> Result<bool, DoctorError> {
        let prompt = {
            let doctor = self.find(doctor_id).ok_or(DoctorError::NotFound(doctor_id))?;
            format!("Are you sure you want to delete Dr. {}?", doctor.display_name())
        };

        if !confirmation.confirm(&prompt) {
            debug!("Delete of doctor {} not confirmed", doctor_id);
            return Ok(false);
        }

        match service.delete_doctor(doctor_id, token).await {
            Ok(outcome) if outcome.success => {
                self.doctors.retain(|d| d.id != doctor_id);
                notifier.notify(Notice::success(outcome.message_or("Doctor deleted")));
                Ok(true)
            }
            Ok(outcome) => {
                notifier.notify(Notice::error(outcome.message_or("Failed to delete doctor")));
                Ok(false)
            }
            Err(err) => {
                notifier.notify(Notice::error(err.user_message()));
                Ok(false)
            }
        }
    }
}
