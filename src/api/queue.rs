//! `/queue` endpoints.

use super::ApiClient;
use crate::error::Result;
use crate::models::{NewQueueEntry, QueueEntry, QueueUpdate};

impl ApiClient {
    pub async fn get_queue(&self) -> Result<Vec<QueueEntry>> {
        self.fetch(self.get("/queue")).await
    }

    pub async fn add_to_queue(&self, entry: &NewQueueEntry) -> Result<()> {
        self.send(self.post("/queue").json(entry)).await?;
        Ok(())
    }

    pub async fn update_queue_entry(&self, id: i32, update: &QueueUpdate) -> Result<()> {
        self.send(self.patch(&format!("/queue/{id}")).json(update)).await?;
        Ok(())
    }

    pub async fn remove_from_queue(&self, id: i32) -> Result<()> {
        self.send(self.delete(&format!("/queue/{id}"))).await?;
        Ok(())
    }
}
