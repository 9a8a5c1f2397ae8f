//! Data models for queue entries, doctors, appointments and auth.

pub mod appointment;
pub mod auth;
pub mod doctor;
pub mod queue;

pub use appointment::{Appointment, AppointmentQuery, AppointmentStatus, AppointmentUpdate, NewAppointment};
pub use auth::{Credentials, LoginResponse};
pub use doctor::{Doctor, DoctorFilter, DoctorPayload, DoctorStatus, Gender};
pub use queue::{NewQueueEntry, Priority, QueueEntry, QueueStatus, QueueUpdate};
