use serde::{Deserialize, Serialize};

/// Result of a mutating API call, normalized to `{success, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    pub message: Option<String>,
}

impl Outcome {
    pub fn ok(message: Option<String>) -> Self {
        Self { success: true, message }
    }

    pub fn failed(message: Option<String>) -> Self {
        Self { success: false, message }
    }

    /// Server message when it carried one, else `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        match self.message.as_deref() {
            Some(message) if !message.trim().is_empty() => message.to_string(),
            _ => fallback.to_string(),
        }
    }
}
