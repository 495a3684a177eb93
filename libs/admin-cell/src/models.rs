use serde::{Deserialize, Serialize};

/// Record counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub doctors: u64,
    #[serde(default)]
    pub patients: u64,
    #[serde(default)]
    pub appointments: u64,
}
