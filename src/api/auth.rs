//! `/auth` endpoints.

use tracing::info;

use super::ApiClient;
use crate::error::Result;
use crate::models::{Credentials, LoginResponse};

impl ApiClient {
    /// Log in and start the session with the issued token.
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        let request = self.post("/auth/login").json(credentials);
        let response: LoginResponse = self.send_anonymous(request).await?.json().await?;
        self.session().begin(response.access_token);
        info!("Logged in as {}", credentials.email);
        Ok(())
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<()> {
        let request = self.post("/auth/register").json(credentials);
        self.send_anonymous(request).await?;
        info!("Registered account {}", credentials.email);
        Ok(())
    }

    /// End the session locally. The backend keeps no session state.
    pub fn logout(&self) {
        self.session().end();
        info!("Logged out");
    }
}
