pub mod appointment;
pub mod booking;
pub mod lifecycle;
pub mod selection;
pub mod status;
pub mod views;

pub use appointment::{AppointmentGateway, AppointmentService};
pub use booking::{compose_appointment_date, reschedule_appointment, BookingForm, BookingOverlay, OverlayState, SubmitOutcome};
pub use lifecycle::{AppointmentLifecycleService, StatusTransitionController};
pub use selection::{is_upcoming, next_upcoming, select_appointments, Counterpart, Tab};
pub use status::{normalize_status, NormalizedStatus};
pub use views::{DoctorScheduleView, PatientAppointmentsView};
