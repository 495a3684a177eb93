// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, info, warn};

use shared_models::{Confirmation, Notice, Notifier};

use crate::models::{Appointment, AppointmentStatus, TransitionError};
use crate::services::appointment::AppointmentGateway;
use crate::services::status::NormalizedStatus;

#[derive(Debug, Default, Clone, Copy)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: &NormalizedStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), TransitionError> {
        debug!("Validating status transition from {} to {}", current_status.label, new_status);

        if new_status == AppointmentStatus::Pending {
            return Err(TransitionError::InvalidTarget);
        }

        if !self.get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status.label, new_status);
            return Err(TransitionError::InvalidStatusTransition(current_status.label.clone()));
        }

        Ok(())
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(&self, current_status: &NormalizedStatus) -> Vec<AppointmentStatus> {
        match current_status.canonical {
            Some(AppointmentStatus::Pending) => vec![AppointmentStatus::Completed, AppointmentStatus::Cancelled],
            // Terminal or unrecognized: no transitions
            _ => vec![],
        }
    }

    pub fn confirmation_prompt(&self, target: AppointmentStatus) -> &'static str {
        match target {
            AppointmentStatus::Completed => "Mark this appointment as completed?",
            _ => "Are you sure you want to cancel this appointment?",
        }
    }
}

/// Drives confirm -> API call -> notify for the status controls.
pub struct StatusTransitionController<'a, G: ?Sized> {
    gateway: &'a G,
    lifecycle: AppointmentLifecycleService,
}

impl<'a, G> StatusTransitionController<'a, G>
where
    G: AppointmentGateway + ?Sized,
{
    pub fn new(gateway: &'a G) -> Self {
        Self {
            gateway,
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    /// Doctor-side Complete/Cancel via the status endpoint. `Ok(false)` when
    /// the user declined or the server refused.
    pub async fn request_status_change(
        &self,
        appointment: &Appointment,
        target: AppointmentStatus,
        token: &str,
        confirmation: &dyn Confirmation,
        notifier: &dyn Notifier,
    ) -> Result<bool, TransitionError> {
        self.lifecycle.validate_status_transition(&appointment.status, target)?;

        if !confirmation.confirm(self.lifecycle.confirmation_prompt(target)) {
            debug!("Status change of appointment {} not confirmed", appointment.id);
            return Ok(false);
        }

        match self.gateway.update_status(appointment.id, target, token).await {
            Ok(outcome) if outcome.success => {
                info!("Appointment {} marked {}", appointment.id, target);
                notifier.notify(Notice::success(format!("Appointment marked as {}", target.label())));
                Ok(true)
            }
            Ok(outcome) => {
                notifier.notify(Notice::error(outcome.message_or("Failed to update appointment status")));
                Ok(false)
            }
            Err(err) => {
                warn!("Status update for appointment {} failed: {}", appointment.id, err);
                notifier.notify(Notice::error(err.user_message()));
                Ok(false)
            }
        }
    }

    /// Patient-side cancel via the hard-delete endpoint.
    pub async fn cancel(
        &self,
        appointment: &Appointment,
        token: &str,
        confirmation: &dyn Confirmation,
        notifier: &dyn Notifier,
    ) -> Result<bool, TransitionError> {
        self.lifecycle
            .validate_status_transition(&appointment.status, AppointmentStatus::Cancelled)?;

        if !confirmation.confirm(self.lifecycle.confirmation_prompt(AppointmentStatus::Cancelled)) {
            debug!("Cancellation of appointment {} not confirmed", appointment.id);
            return Ok(false);
        }

        match self.gateway.cancel(appointment.id, token).await {
            Ok(outcome) if outcome.success => {
                info!("Appointment {} cancelled", appointment.id);
                notifier.notify(Notice::success("Appointment cancelled"));
                Ok(true)
            }
            Ok(outcome) => {
                notifier.notify(Notice::error(outcome.message_or("Failed to cancel")));
                Ok(false)
            }
            Err(err) => {
                warn!("Cancellation of appointment {} failed: {}", appointment.id, err);
                notifier.notify(Notice::error("System error: could not cancel appointment"));
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn pending_moves_to_terminal_states_only() {
        let lifecycle = AppointmentLifecycleService::new();
        let pending = NormalizedStatus::known(AppointmentStatus::Pending);

        assert!(lifecycle
            .validate_status_transition(&pending, AppointmentStatus::Completed)
            .is_ok());
        assert!(lifecycle
            .validate_status_transition(&pending, AppointmentStatus::Cancelled)
            .is_ok());
        assert_matches!(
            lifecycle.validate_status_transition(&pending, AppointmentStatus::Pending),
            Err(TransitionError::InvalidTarget)
        );
    }

    #[test]
    fn terminal_states_have_no_transitions() {
        let lifecycle = AppointmentLifecycleService::new();
        for status in [AppointmentStatus::Completed, AppointmentStatus::Cancelled] {
            let current = NormalizedStatus::known(status);
            assert!(lifecycle.get_valid_transitions(&current).is_empty());
            assert_matches!(
                lifecycle.validate_status_transition(&current, AppointmentStatus::Cancelled),
                Err(TransitionError::InvalidStatusTransition(_))
            );
        }
    }
}
