//! `/doctors` endpoints.

use super::ApiClient;
use crate::error::Result;
use crate::models::{Doctor, DoctorFilter, DoctorPayload};

impl ApiClient {
    pub async fn get_doctors(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>> {
        self.fetch(self.get("/doctors").query(filter)).await
    }

    pub async fn create_doctor(&self, doctor: &DoctorPayload) -> Result<()> {
        self.send(self.post("/doctors").json(doctor)).await?;
        Ok(())
    }

    pub async fn update_doctor(&self, id: i32, doctor: &DoctorPayload) -> Result<()> {
        self.send(self.patch(&format!("/doctors/{id}")).json(doctor)).await?;
        Ok(())
    }

    pub async fn delete_doctor(&self, id: i32) -> Result<()> {
        self.send(self.delete(&format!("/doctors/{id}"))).await?;
        Ok(())
    }
}
