use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{read_json, ApiClient, ApiError};

/// Server-issued admin session, kept in memory only.
#[derive(Clone)]
pub struct AdminSession {
    username: String,
    token: String,
    signed_in_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            signed_in_at: Utc::now(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    pub fn signed_in_at(&self) -> DateTime<Utc> {
        self.signed_in_at
    }
}

impl fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSession")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .field("signed_in_at", &self.signed_in_at)
            .finish()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// Exchanges admin credentials for a session token.
#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AdminSession, ApiError> {
        let url = self.api.endpoint("admin/login")?;
        tracing::debug!(url = %url, username, "signing in");
        let response = self
            .api
            .http()
            .post(url)
            .timeout(self.api.reference_timeout())
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        let body: LoginResponse = read_json(response).await?;
        if body.token.trim().is_empty() {
            return Err(ApiError::Unexpected("login response carried an empty token".into()));
        }
        tracing::info!(username, "admin signed in");
        Ok(AdminSession::new(username, body.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_token() {
        let session = AdminSession::new("admin", "secret-token");
        let rendered = format!("{:?}", session);
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("secret-token"));
    }
}
