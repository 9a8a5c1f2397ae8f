//! Appointment records, request bodies and search query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    Booked,
    Completed,
    Canceled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Booked,
        AppointmentStatus::Completed,
        AppointmentStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "Booked",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Canceled => "Canceled",
        }
    }

    /// Completed and Canceled appointments accept no further edits.
    pub fn is_finalized(&self) -> bool {
        !matches!(self, AppointmentStatus::Booked)
    }

    /// Whether the front desk may move an appointment from `self` to `next`.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (AppointmentStatus::Booked, AppointmentStatus::Completed)
                | (AppointmentStatus::Booked, AppointmentStatus::Canceled)
        )
    }
}

/// Scheduled visit as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i32,
    pub patient_name: String,
    pub doctor_id: i32,
    #[serde(default)]
    pub doctor_name: String,
    pub date: NaiveDate,
    /// Scheduled time as `HH:MM`.
    pub time: String,
    #[serde(default)]
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date == day
    }
}

/// Body of `POST /appointments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub patient_name: String,
    pub doctor_id: i32,
    pub date: NaiveDate,
    pub time: String,
}

/// Body of `PATCH /appointments/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

impl AppointmentUpdate {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Full reschedule: every editable field is sent.
    pub fn reschedule(data: NewAppointment) -> Self {
        Self {
            patient_name: Some(data.patient_name),
            doctor_id: Some(data.doctor_id),
            date: Some(data.date),
            time: Some(data.time),
            status: None,
        }
    }
}

/// Query for `GET /appointments`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppointmentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl AppointmentQuery {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            search: None,
            date: Some(date),
        }
    }

    pub fn search(term: &str) -> Self {
        let term = term.trim();
        Self {
            search: (!term.is_empty()).then(|| term.to_string()),
            date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalized_statuses() {
        assert!(!AppointmentStatus::Booked.is_finalized());
        assert!(AppointmentStatus::Completed.is_finalized());
        assert!(AppointmentStatus::Canceled.is_finalized());
    }

    #[test]
    fn test_transitions_only_leave_booked() {
        use AppointmentStatus::*;
        assert!(Booked.can_transition_to(Completed));
        assert!(Booked.can_transition_to(Canceled));
        assert!(!Booked.can_transition_to(Booked));
        for from in [Completed, Canceled] {
            for to in AppointmentStatus::ALL {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn test_deserialize_appointment() {
        let json = r#"{
            "id": 12,
            "patientName": "Sam Lee",
            "doctorId": 3,
            "doctorName": "Ada Grey",
            "date": "2026-10-19",
            "time": "14:30",
            "status": "Booked"
        }"#;
        let appointment: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(appointment.date, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert!(appointment.is_on(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()));
        assert_eq!(appointment.status, AppointmentStatus::Booked);
    }

    #[test]
    fn test_status_update_body() {
        let body = serde_json::to_string(&AppointmentUpdate::status(AppointmentStatus::Canceled)).unwrap();
        assert_eq!(body, r#"{"status":"Canceled"}"#);
    }

    #[test]
    fn test_blank_search_is_omitted() {
        assert_eq!(AppointmentQuery::search("   "), AppointmentQuery::default());
        assert_eq!(AppointmentQuery::search(" grey ").search.as_deref(), Some("grey"));
    }
}
