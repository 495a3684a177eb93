use serde_json::Value;
use tracing::debug;

use crate::models::{AppointmentStatus, RawStatus};

/// Display-ready status. `canonical` is `None` when the server sent a value
/// outside the known set; such appointments render with the default badge
/// and never offer controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedStatus {
    pub canonical: Option<AppointmentStatus>,
    pub label: String,
    pub css_class: &'static str,
}

impl NormalizedStatus {
    pub fn known(status: AppointmentStatus) -> Self {
        Self {
            canonical: Some(status),
            label: status.label().to_string(),
            css_class: match status {
                AppointmentStatus::Pending => "pending",
                AppointmentStatus::Completed => "completed",
                AppointmentStatus::Cancelled => "cancelled",
            },
        }
    }

    pub fn unknown(raw: &RawStatus) -> Self {
        let label = raw.to_string();
        Self {
            canonical: None,
            label: if label.trim().is_empty() { "Unknown".to_string() } else { label },
            css_class: "default",
        }
    }

    /// Only pending appointments accept Complete/Cancel/Reschedule.
    pub fn is_actionable(&self) -> bool {
        self.canonical == Some(AppointmentStatus::Pending)
    }
}

/// Map any server status representation onto the canonical set.
pub fn normalize_status(raw: &RawStatus) -> NormalizedStatus {
    let canonical = match raw {
        RawStatus::Code(code) => from_code(*code),
        RawStatus::Name(name) => from_name(name),
        RawStatus::Other(Value::Number(n)) => n.as_i64().and_then(from_code),
        RawStatus::Other(_) => None,
    };

    match canonical {
        Some(status) => NormalizedStatus::known(status),
        None => {
            debug!("Unrecognized appointment status: {:?}", raw);
            NormalizedStatus::unknown(raw)
        }
    }
}

fn from_code(code: i64) -> Option<AppointmentStatus> {
    match code {
        0 => Some(AppointmentStatus::Pending),
        1 => Some(AppointmentStatus::Completed),
        2 => Some(AppointmentStatus::Cancelled),
        _ => None,
    }
}

fn from_name(name: &str) -> Option<AppointmentStatus> {
    let name = name.trim();
    if let Ok(code) = name.parse::<i64>() {
        return from_code(code);
    }

    match name.to_ascii_lowercase().as_str() {
        "pending" => Some(AppointmentStatus::Pending),
        "completed" => Some(AppointmentStatus::Completed),
        "cancelled" | "canceled" => Some(AppointmentStatus::Cancelled),
        _ => None,
    }
}
