//! `/appointments` endpoints.

use super::ApiClient;
use crate::error::Result;
use crate::models::{Appointment, AppointmentQuery, AppointmentUpdate, NewAppointment};

impl ApiClient {
    pub async fn get_appointments(&self, query: &AppointmentQuery) -> Result<Vec<Appointment>> {
        self.fetch(self.get("/appointments").query(query)).await
    }

    /// Active (not finalized) appointments of one doctor.
    pub async fn get_doctor_schedule(&self, doctor_id: i32) -> Result<Vec<Appointment>> {
        self.fetch(self.get(&format!("/appointments/doctor/{doctor_id}"))).await
    }

    pub async fn create_appointment(&self, appointment: &NewAppointment) -> Result<()> {
        self.send(self.post("/appointments").json(appointment)).await?;
        Ok(())
    }

    pub async fn update_appointment(&self, id: i32, update: &AppointmentUpdate) -> Result<()> {
        self.send(self.patch(&format!("/appointments/{id}")).json(update)).await?;
        Ok(())
    }

    pub async fn delete_appointment(&self, id: i32) -> Result<()> {
        self.send(self.delete(&format!("/appointments/{id}"))).await?;
        Ok(())
    }
}
