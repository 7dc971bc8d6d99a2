use log::info;

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{AuthResponse, LoginRequest};

impl ApiClient {
    /// POST `/auth/login/`; on success the session is started with the returned tokens.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<AuthResponse> {
        info!("Logging in as {}", credentials.identifier);
        let request = self.post("/auth/login/", credentials)?;
        let auth: AuthResponse = self.fetch_data(request, "login response").await?;
        self.session.start(&auth)?;
        Ok(auth)
    }

    pub fn logout(&self) {
        self.session.logout();
    }
}
