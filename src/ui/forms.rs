//! Form state for the dialogs and screens, with validation that turns input
//! into typed request bodies.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};

use crate::error::{AppError, Result};
use crate::models::{
    Appointment, AppointmentUpdate, Credentials, Doctor, DoctorFilter, DoctorPayload, DoctorStatus, Gender,
    NewAppointment, NewQueueEntry, Priority,
};
use crate::queue;

/// Login screen input.
#[derive(Default, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub is_submitting: bool,
}

impl LoginForm {
    pub fn with_email(email: &str) -> Self {
        Self {
            email: email.to_string(),
            ..Default::default()
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.email, &self.password)
    }
}

/// Registration screen input.
#[derive(Default, Clone)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub success: Option<String>,
    pub is_submitting: bool,
}

impl RegisterForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.email, &self.password)
    }
}

/// How a patient arrives at the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatientType {
    #[default]
    WalkIn,
    Appointment,
}

/// Add-to-queue dialog.
#[derive(Default, Clone)]
pub struct QueueForm {
    pub is_open: bool,
    pub patient_type: PatientType,
    pub walk_in_name: String,
    pub selected_appointment: Option<i32>,
    pub priority: Priority,
}

impl QueueForm {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn open() -> Self {
        Self {
            is_open: true,
            ..Default::default()
        }
    }

    /// Build the queue entry from the form.
    ///
    /// `candidates` are today's appointments still eligible for queueing;
    /// `now` stamps walk-in arrivals.
    pub fn build<Tz: TimeZone>(&self, candidates: &[Appointment], now: &DateTime<Tz>) -> Result<NewQueueEntry>
    where
        Tz::Offset: std::fmt::Display,
    {
        let missing = || AppError::validation("Please select or enter a patient name.");
        match self.patient_type {
            PatientType::WalkIn => {
                if self.walk_in_name.trim().is_empty() {
                    return Err(missing());
                }
                Ok(queue::walk_in(&self.walk_in_name, self.priority, now))
            }
            PatientType::Appointment => {
                let appointment = self
                    .selected_appointment
                    .and_then(|id| candidates.iter().find(|a| a.id == id))
                    .ok_or_else(missing)?;
                Ok(queue::from_appointment(appointment, self.priority))
            }
        }
    }
}

/// Doctor create/edit dialog.
#[derive(Default, Clone)]
pub struct DoctorForm {
    pub id: Option<i32>,
    pub name: String,
    pub specialization: String,
    pub gender: Gender,
    pub location: String,
    pub status: DoctorStatus,
    pub next_available: String,
    pub is_open: bool,
}

impl DoctorForm {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn new_doctor() -> Self {
        Self {
            is_open: true,
            ..Default::default()
        }
    }

    /// Create a form pre-filled for editing an existing doctor.
    pub fn edit(doctor: &Doctor) -> Self {
        Self {
            id: Some(doctor.id),
            name: doctor.name.clone(),
            specialization: doctor.specialization.clone(),
            gender: doctor.gender,
            location: doctor.location.clone(),
            status: doctor.status,
            next_available: doctor.next_available.clone(),
            is_open: true,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub fn to_payload(&self) -> Result<DoctorPayload> {
        let required = [
            ("Name", &self.name),
            ("Specialization", &self.specialization),
            ("Location", &self.location),
            ("Next available", &self.next_available),
        ];
        if let Some((label, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AppError::validation(format!("{label} is required.")));
        }

        Ok(DoctorPayload {
            name: self.name.trim().to_string(),
            specialization: self.specialization.trim().to_string(),
            gender: self.gender,
            location: self.location.trim().to_string(),
            status: self.status,
            next_available: self.next_available.trim().to_string(),
        })
    }
}

/// Doctor directory filter inputs.
#[derive(Default, Clone)]
pub struct DoctorFilterForm {
    pub specialization: String,
    pub location: String,
    pub status: Option<DoctorStatus>,
}

impl DoctorFilterForm {
    pub fn to_filter(&self) -> DoctorFilter {
        DoctorFilter::from_input(&self.specialization, &self.location, self.status)
    }

    pub fn is_empty(&self) -> bool {
        self.to_filter() == DoctorFilter::default()
    }
}

/// What the appointment dialog submits.
#[derive(Debug, Clone, PartialEq)]
pub enum AppointmentSubmission {
    Create(NewAppointment),
    Reschedule(i32, AppointmentUpdate),
}

/// Schedule / reschedule appointment dialog.
#[derive(Clone)]
pub struct AppointmentForm {
    pub id: Option<i32>,
    pub patient_name: String,
    pub doctor_id: Option<i32>,
    pub date: NaiveDate,
    pub time: String,
    pub is_open: bool,
}

impl Default for AppointmentForm {
    fn default() -> Self {
        Self {
            id: None,
            patient_name: String::new(),
            doctor_id: None,
            date: queue::today(),
            time: String::new(),
            is_open: false,
        }
    }
}

impl AppointmentForm {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn new_appointment(date: NaiveDate) -> Self {
        Self {
            date,
            is_open: true,
            ..Default::default()
        }
    }

    /// Create a form pre-filled for rescheduling.
    pub fn edit(appointment: &Appointment) -> Self {
        Self {
            id: Some(appointment.id),
            patient_name: appointment.patient_name.clone(),
            doctor_id: Some(appointment.doctor_id),
            date: appointment.date,
            time: appointment.time.clone(),
            is_open: true,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub fn submission(&self) -> Result<AppointmentSubmission> {
        let doctor_id = self
            .doctor_id
            .ok_or_else(|| AppError::validation("Please select a doctor."))?;
        if self.patient_name.trim().is_empty() {
            return Err(AppError::validation("Patient name is required."));
        }
        let time = parse_time(&self.time)
            .ok_or_else(|| AppError::validation("Time must be in HH:MM format."))?;

        let data = NewAppointment {
            patient_name: self.patient_name.trim().to_string(),
            doctor_id,
            date: self.date,
            time: time.format("%H:%M").to_string(),
        };
        Ok(match self.id {
            Some(id) => AppointmentSubmission::Reschedule(id, AppointmentUpdate::reschedule(data)),
            None => AppointmentSubmission::Create(data),
        })
    }
}

/// Parse a time of day, accepting `HH:MM` and `HH:MM:SS`.
fn parse_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    ["%H:%M", "%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(input, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use chrono::{Local, Utc};

    fn appointment(id: i32, name: &str) -> Appointment {
        Appointment {
            id,
            patient_name: name.to_string(),
            doctor_id: 2,
            doctor_name: "Ada Grey".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            time: "11:00".to_string(),
            status: AppointmentStatus::Booked,
        }
    }

    #[test]
    fn test_walk_in_requires_name() {
        let form = QueueForm {
            walk_in_name: "   ".to_string(),
            ..QueueForm::open()
        };
        let err = form.build(&[], &Local::now()).unwrap_err();
        assert_eq!(err.user_message(), "Please select or enter a patient name.");
    }

    #[test]
    fn test_walk_in_never_scheduled() {
        let form = QueueForm {
            walk_in_name: "Jane Doe".to_string(),
            ..QueueForm::open()
        };
        let entry = form.build(&[appointment(1, "Jane Doe")], &Utc::now()).unwrap();
        assert_eq!(entry.est_wait, queue::WALK_IN_WAIT);
        assert_eq!(entry.appointment_id, None);
    }

    #[test]
    fn test_appointment_patient_is_scheduled() {
        let form = QueueForm {
            patient_type: PatientType::Appointment,
            selected_appointment: Some(5),
            priority: Priority::Urgent,
            ..QueueForm::open()
        };
        let entry = form.build(&[appointment(5, "Sam Lee")], &Utc::now()).unwrap();
        assert_eq!(entry.patient_name, "Sam Lee");
        assert_eq!(entry.arrival, "11:00");
        assert_eq!(entry.est_wait, queue::SCHEDULED_WAIT);
        assert_eq!(entry.appointment_id, Some(5));
    }

    #[test]
    fn test_appointment_selection_must_be_candidate() {
        let form = QueueForm {
            patient_type: PatientType::Appointment,
            selected_appointment: Some(99),
            ..QueueForm::open()
        };
        assert!(form.build(&[appointment(5, "Sam Lee")], &Utc::now()).is_err());
    }

    #[test]
    fn test_doctor_form_required_fields() {
        let mut form = DoctorForm::new_doctor();
        form.name = "Ada Grey".to_string();
        form.specialization = "Cardiology".to_string();
        form.location = "Room 101".to_string();
        let err = form.to_payload().unwrap_err();
        assert_eq!(err.user_message(), "Next available is required.");

        form.next_available = "Now".to_string();
        let payload = form.to_payload().unwrap();
        assert_eq!(payload.gender, Gender::Male);
        assert_eq!(payload.status, DoctorStatus::Available);
    }

    #[test]
    fn test_doctor_form_edit_roundtrip() {
        let doctor = Doctor {
            id: 3,
            name: "Ada Grey".to_string(),
            specialization: "Cardiology".to_string(),
            gender: Gender::Female,
            location: "Room 101".to_string(),
            status: DoctorStatus::Busy,
            next_available: "2:30 PM".to_string(),
        };
        let form = DoctorForm::edit(&doctor);
        assert!(form.is_editing());
        assert_eq!(form.to_payload().unwrap(), DoctorPayload::from(&doctor));
    }

    #[test]
    fn test_appointment_requires_doctor() {
        let mut form = AppointmentForm::new_appointment(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        form.patient_name = "Sam Lee".to_string();
        form.time = "09:30".to_string();
        let err = form.submission().unwrap_err();
        assert_eq!(err.user_message(), "Please select a doctor.");
    }

    #[test]
    fn test_appointment_time_normalized() {
        let mut form = AppointmentForm::new_appointment(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        form.patient_name = " Sam Lee ".to_string();
        form.doctor_id = Some(2);
        form.time = "9:05".to_string();
        match form.submission().unwrap() {
            AppointmentSubmission::Create(data) => {
                assert_eq!(data.time, "09:05");
                assert_eq!(data.patient_name, "Sam Lee");
            }
            other => panic!("unexpected submission: {other:?}"),
        }

        form.time = "25:00".to_string();
        assert!(form.submission().is_err());
    }

    #[test]
    fn test_edit_submits_reschedule() {
        let form = AppointmentForm::edit(&appointment(8, "Sam Lee"));
        match form.submission().unwrap() {
            AppointmentSubmission::Reschedule(id, update) => {
                assert_eq!(id, 8);
                assert_eq!(update.time.as_deref(), Some("11:00"));
                assert_eq!(update.status, None);
            }
            other => panic!("unexpected submission: {other:?}"),
        }
    }

    #[test]
    fn test_filter_form_empty() {
        let mut form = DoctorFilterForm::default();
        assert!(form.is_empty());
        form.location = "  ".to_string();
        assert!(form.is_empty());
        form.status = Some(DoctorStatus::Busy);
        assert!(!form.is_empty());
    }
}
