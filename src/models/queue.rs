//! Queue entry records and request bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Queue priority. Urgent entries are seen first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Normal,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 2] = [Priority::Normal, Priority::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "Normal",
            Priority::Urgent => "Urgent",
        }
    }
}

/// Where a patient is in the visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QueueStatus {
    #[default]
    Waiting,
    #[serde(rename = "With Doctor")]
    WithDoctor,
    Completed,
}

impl QueueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Waiting => "Waiting",
            QueueStatus::WithDoctor => "With Doctor",
            QueueStatus::Completed => "Completed",
        }
    }
}

/// A patient waiting for or being seen by a doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub id: i32,
    pub patient_name: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: QueueStatus,
    #[serde(default)]
    pub arrival: String,
    #[serde(default)]
    pub est_wait: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub appointment_id: Option<i32>,
    #[serde(default)]
    pub doctor_id: Option<i32>,
}

/// Body of `POST /queue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQueueEntry {
    pub patient_name: String,
    pub priority: Priority,
    pub arrival: String,
    pub est_wait: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<i32>,
}

/// Body of `PATCH /queue/:id`. Unset fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QueueStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_entry() {
        let json = r#"{
            "id": 4,
            "patientName": "Jane Doe",
            "priority": "Urgent",
            "status": "With Doctor",
            "arrival": "09:15",
            "estWait": "15 min",
            "createdAt": "2026-10-19T09:15:00.000Z",
            "appointmentId": null,
            "doctorId": 7
        }"#;
        let entry: QueueEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.priority, Priority::Urgent);
        assert_eq!(entry.status, QueueStatus::WithDoctor);
        assert_eq!(entry.doctor_id, Some(7));
        assert_eq!(entry.appointment_id, None);
    }

    #[test]
    fn test_update_skips_unset_fields() {
        let update = QueueUpdate {
            priority: Some(Priority::Urgent),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"priority":"Urgent"}"#);
    }

    #[test]
    fn test_new_entry_omits_missing_appointment() {
        let entry = NewQueueEntry {
            patient_name: "Jane Doe".to_string(),
            priority: Priority::Normal,
            arrival: "09:15".to_string(),
            est_wait: "15 min".to_string(),
            appointment_id: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""patientName":"Jane Doe""#));
        assert!(json.contains(r#""estWait":"15 min""#));
        assert!(!json.contains("appointmentId"));
    }
}
