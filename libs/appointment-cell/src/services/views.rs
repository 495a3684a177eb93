use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use shared_models::{Confirmation, GatewayError, Notice, Notifier, Role};
use shared_utils::{Fragment, LoadGeneration, LoadTicket};

use crate::models::{Appointment, AppointmentStatus, BookingError, ScheduleQuery, TransitionError};
use crate::render::{render_appointment_list, render_next_appointment, render_schedule_rows};
use crate::services::appointment::AppointmentGateway;
use crate::services::booking::reschedule_appointment;
use crate::services::lifecycle::StatusTransitionController;
use crate::services::selection::{next_upcoming, select_appointments, Counterpart, Tab};

/// A logged-in patient's appointments, split into upcoming and past tabs.
#[derive(Debug)]
pub struct PatientAppointmentsView {
    patient_id: i64,
    appointments: Vec<Appointment>,
    generation: LoadGeneration,
}

impl PatientAppointmentsView {
    pub fn new(patient_id: i64) -> Self {
        Self {
            patient_id,
            appointments: Vec::new(),
            generation: LoadGeneration::new(),
        }
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation.begin()
    }

    pub fn apply(&mut self, ticket: LoadTicket, appointments: Vec<Appointment>) -> bool {
        if !self.generation.is_current(ticket) {
            debug!("Discarding stale appointment list ({} entries)", appointments.len());
            return false;
        }
        self.appointments = appointments;
        true
    }

    pub async fn load<G>(&mut self, gateway: &G, token: &str) -> Result<(), GatewayError>
    where
        G: AppointmentGateway + ?Sized,
    {
        let ticket = self.begin_load();
        let appointments = gateway
            .patient_appointments(self.patient_id, Role::LoggedPatient, token)
            .await?;
        self.apply(ticket, appointments);
        Ok(())
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn find(&self, appointment_id: i64) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == appointment_id)
    }

    pub fn render(&self, tab: Tab, search: Option<&str>, now: NaiveDateTime) -> Fragment {
        let selected = select_appointments(&self.appointments, tab, search, now, Counterpart::Doctor);
        render_appointment_list(&selected, tab, Role::LoggedPatient)
    }

    pub fn next_upcoming(&self, now: NaiveDateTime) -> Option<&Appointment> {
        next_upcoming(&self.appointments, now)
    }

    pub fn render_next(&self, now: NaiveDateTime) -> Fragment {
        render_next_appointment(self.next_upcoming(now))
    }

    /// Confirm, hard-cancel, then reload so the card moves tabs.
    pub async fn cancel<G>(
        &mut self,
        gateway: &G,
        appointment_id: i64,
        token: &str,
        confirmation: &dyn Confirmation,
        notifier: &dyn Notifier,
    ) -> Result<bool, TransitionError>
    where
        G: AppointmentGateway + ?Sized,
    {
        let appointment = self
            .find(appointment_id)
            .cloned()
            .ok_or(TransitionError::NotFound(appointment_id))?;

        let cancelled = StatusTransitionController::new(gateway)
            .cancel(&appointment, token, confirmation, notifier)
            .await?;

        if cancelled {
            self.reload(gateway, token, notifier).await;
        }
        Ok(cancelled)
    }

    pub async fn reschedule<G>(
        &mut self,
        gateway: &G,
        appointment_id: i64,
        date: &str,
        slot: &str,
        today: NaiveDate,
        token: &str,
        notifier: &dyn Notifier,
    ) -> Result<bool, BookingError>
    where
        G: AppointmentGateway + ?Sized,
    {
        let Some(appointment) = self.find(appointment_id).cloned() else {
            notifier.notify(Notice::error("Appointment not found"));
            return Ok(false);
        };

        let moved = reschedule_appointment(gateway, &appointment, date, slot, today, token, notifier).await?;
        if moved {
            self.reload(gateway, token, notifier).await;
        }
        Ok(moved)
    }

    async fn reload<G>(&mut self, gateway: &G, token: &str, notifier: &dyn Notifier)
    where
        G: AppointmentGateway + ?Sized,
    {
        if let Err(err) = self.load(gateway, token).await {
            warn!("Reloading appointments failed: {}", err);
            notifier.notify(Notice::error("Error loading data"));
        }
    }
}

/// A doctor's appointments for one day, optionally narrowed by patient name.
#[derive(Debug)]
pub struct DoctorScheduleView {
    query: ScheduleQuery,
    appointments: Vec<Appointment>,
    generation: LoadGeneration,
}

impl DoctorScheduleView {
    pub fn new(query: ScheduleQuery) -> Self {
        Self {
            query,
            appointments: Vec::new(),
            generation: LoadGeneration::new(),
        }
    }

    pub fn query(&self) -> &ScheduleQuery {
        &self.query
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation.begin()
    }

    pub fn apply(&mut self, ticket: LoadTicket, appointments: Vec<Appointment>) -> bool {
        if !self.generation.is_current(ticket) {
            debug!("Discarding stale schedule ({} entries)", appointments.len());
            return false;
        }
        self.appointments = appointments;
        true
    }

    /// Switch date or name filter and reload.
    pub async fn set_query<G>(&mut self, gateway: &G, query: ScheduleQuery, token: &str) -> Result<(), GatewayError>
    where
        G: AppointmentGateway + ?Sized,
    {
        self.query = query;
        self.load(gateway, token).await
    }

    pub async fn load<G>(&mut self, gateway: &G, token: &str) -> Result<(), GatewayError>
    where
        G: AppointmentGateway + ?Sized,
    {
        let ticket = self.begin_load();
        let appointments = gateway.doctor_appointments(&self.query, token).await?;
        self.apply(ticket, appointments);
        Ok(())
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn find(&self, appointment_id: i64) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == appointment_id)
    }

    pub fn render(&self) -> Fragment {
        render_schedule_rows(&self.appointments)
    }

    pub async fn change_status<G>(
        &mut self,
        gateway: &G,
        appointment_id: i64,
        target: AppointmentStatus,
        token: &str,
        confirmation: &dyn Confirmation,
        notifier: &dyn Notifier,
    ) -> Result<bool, TransitionError>
    where
        G: AppointmentGateway + ?Sized,
    {
        let appointment = self
            .find(appointment_id)
            .cloned()
            .ok_or(TransitionError::NotFound(appointment_id))?;

        let changed = StatusTransitionController::new(gateway)
            .request_status_change(&appointment, target, token, confirmation, notifier)
            .await?;

        if changed {
            if let Err(err) = self.load(gateway, token).await {
                warn!("Reloading schedule failed: {}", err);
                notifier.notify(Notice::error("Error loading data"));
            }
        }
        Ok(changed)
    }
}
