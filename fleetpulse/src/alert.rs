//! Alert record shapes consumed by the presentation collaborator.
//!
//! No alert lifecycle logic lives in the engine; these types only pin down
//! the shape the dashboard expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How urgent an alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

/// An alert shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub id: String,
    pub message: String,
    pub severity: AlertSeverity,
    pub is_read: bool,
    pub timestamp: DateTime<Utc>,
}

impl AlertRecord {
    /// Create an unread alert stamped with the current time.
    pub fn new(message: impl Into<String>, severity: AlertSeverity) -> Self {
        let now = Utc::now();
        Self {
            id: format!("alert-{}", now.timestamp_millis()),
            message: message.into(),
            severity,
            is_read: false,
            timestamp: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_alert_is_unread() {
        let alert = AlertRecord::new("Speed limit exceeded", AlertSeverity::Warning);

        assert!(!alert.is_read);
        assert_eq!(alert.severity, AlertSeverity::Warning);
        assert!(alert.id.starts_with("alert-"));
    }

    #[test]
    fn test_alert_serializes_with_camel_case_keys() {
        let alert = AlertRecord::new("Engine check", AlertSeverity::Critical);
        let json = serde_json::to_value(&alert).unwrap();

        assert!(json.get("isRead").is_some());
        assert_eq!(json["severity"], "critical");
    }
}
