//! Doctor profile records, request bodies and directory filters.

use serde::{Deserialize, Serialize};

/// Doctor availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DoctorStatus {
    #[default]
    Available,
    Busy,
    #[serde(rename = "Off Duty")]
    OffDuty,
}

impl DoctorStatus {
    pub const ALL: [DoctorStatus; 3] = [DoctorStatus::Available, DoctorStatus::Busy, DoctorStatus::OffDuty];

    pub fn as_str(&self) -> &'static str {
        match self {
            DoctorStatus::Available => "Available",
            DoctorStatus::Busy => "Busy",
            DoctorStatus::OffDuty => "Off Duty",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// Doctor profile as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: i32,
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: DoctorStatus,
    #[serde(default)]
    pub next_available: String,
}

/// Body of `POST /doctors` and `PATCH /doctors/:id`.
///
/// The id is never part of the body; updates address the doctor by path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorPayload {
    pub name: String,
    pub specialization: String,
    pub gender: Gender,
    pub location: String,
    pub status: DoctorStatus,
    pub next_available: String,
}

/// Query for `GET /doctors`. Empty filters are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DoctorFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DoctorStatus>,
}

impl DoctorFilter {
    /// Filter for doctors that can be assigned to queue entries.
    pub fn available() -> Self {
        Self {
            status: Some(DoctorStatus::Available),
            ..Default::default()
        }
    }

    /// Build a filter from raw input, dropping blank text fields.
    pub fn from_input(specialization: &str, location: &str, status: Option<DoctorStatus>) -> Self {
        let non_blank = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        Self {
            specialization: non_blank(specialization),
            location: non_blank(location),
            status,
        }
    }

    /// Whether a doctor satisfies this filter.
    ///
    /// Mirrors the server-side semantics: case-insensitive substring match on
    /// text fields, exact match on status.
    pub fn matches(&self, doctor: &Doctor) -> bool {
        let contains = |haystack: &str, needle: &Option<String>| {
            needle
                .as_ref()
                .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
        };
        contains(&doctor.specialization, &self.specialization)
            && contains(&doctor.location, &self.location)
            && self.status.is_none_or(|s| s == doctor.status)
    }
}

impl From<&Doctor> for DoctorPayload {
    fn from(doctor: &Doctor) -> Self {
        Self {
            name: doctor.name.clone(),
            specialization: doctor.specialization.clone(),
            gender: doctor.gender,
            location: doctor.location.clone(),
            status: doctor.status,
            next_available: doctor.next_available.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(id: i32, specialization: &str, location: &str, status: DoctorStatus) -> Doctor {
        Doctor {
            id,
            name: format!("Doctor {id}"),
            specialization: specialization.to_string(),
            gender: Gender::Female,
            location: location.to_string(),
            status,
            next_available: "Now".to_string(),
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&DoctorStatus::OffDuty).unwrap(), r#""Off Duty""#);
        let status: DoctorStatus = serde_json::from_str(r#""Busy""#).unwrap();
        assert_eq!(status, DoctorStatus::Busy);
    }

    #[test]
    fn test_filter_from_input_drops_blanks() {
        let filter = DoctorFilter::from_input("  ", " Room 1 ", None);
        assert_eq!(filter.specialization, None);
        assert_eq!(filter.location.as_deref(), Some("Room 1"));
        assert_eq!(filter.status, None);
    }

    #[test]
    fn test_available_filter_excludes_busy_and_off_duty() {
        let doctors = vec![
            doctor(1, "Cardiology", "Room 101", DoctorStatus::Available),
            doctor(2, "Cardiology", "Room 102", DoctorStatus::Busy),
            doctor(3, "Pediatrics", "Room 103", DoctorStatus::OffDuty),
        ];
        let filter = DoctorFilter::available();
        let ids: Vec<i32> = doctors.iter().filter(|d| filter.matches(d)).map(|d| d.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let filter = DoctorFilter::from_input("cardio", "", None);
        assert!(filter.matches(&doctor(1, "Cardiology", "Room 101", DoctorStatus::Busy)));
        assert!(!filter.matches(&doctor(2, "Pediatrics", "Room 101", DoctorStatus::Busy)));
    }

    #[test]
    fn test_payload_has_no_id() {
        let payload = DoctorPayload::from(&doctor(9, "Dermatology", "Room 9", DoctorStatus::Available));
        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(json.contains(r#""nextAvailable":"Now""#));
    }
}
