//! REST clients for the donation backend.

pub mod admin;
pub mod auth;
pub mod error;
pub mod reference;
pub mod submission;

use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::errors::DeskError;

pub use admin::AdminClient;
pub use auth::{AdminSession, AuthClient};
pub use error::{
    ApiError, CONNECTIVITY_MESSAGE, SUBMISSION_FALLBACK_MESSAGE, SUBMISSION_SUCCESS_MESSAGE,
};
pub use reference::{ReferenceData, ReferenceDataLoader};
pub use submission::{HttpSubmissionClient, Submission, SubmissionClient, SubmissionReceipt};

pub const DEFAULT_SUBMISSION_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_REFERENCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared HTTP plumbing: one connection pool, the base URL and the two
/// timeouts every call picks from.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    submission_timeout: Duration,
    reference_timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, DeskError> {
        let base = parse_base(base_url)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("donation-desk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| DeskError::Config(format!("unable to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            base,
            submission_timeout: DEFAULT_SUBMISSION_TIMEOUT,
            reference_timeout: DEFAULT_REFERENCE_TIMEOUT,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, DeskError> {
        Ok(Self::new(&config.api_base_url)?
            .with_timeouts(config.submission_timeout(), config.reference_timeout()))
    }

    pub fn with_timeouts(mut self, submission: Duration, reference: Duration) -> Self {
        self.submission_timeout = submission;
        self.reference_timeout = reference;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn submission_timeout(&self) -> Duration {
        self.submission_timeout
    }

    pub fn reference_timeout(&self) -> Duration {
        self.reference_timeout
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Resolves `path` (e.g. `admin/donations`) below the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::Unexpected(format!("invalid endpoint `{path}`: {err}")))
    }
}

fn parse_base(raw: &str) -> Result<Url, DeskError> {
    let trimmed = raw.trim();
    // Url::join drops the last segment unless the base ends with a slash.
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&normalized)
        .map_err(|err| DeskError::Config(format!("invalid API base URL `{trimmed}`: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DeskError::Config(format!(
            "API base URL must use http or https, got `{}`",
            url.scheme()
        )));
    }
    Ok(url)
}

/// Turns a non-success response into an [`ApiError`], passing successes on.
pub(crate) async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.map_err(ApiError::from_transport)?;
    Err(ApiError::from_status(status, &body))
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let body = response.bytes().await.map_err(ApiError::from_transport)?;
    serde_json::from_slice(&body)
        .map_err(|err| ApiError::Unexpected(format!("malformed response body: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_stay_below_base_path() {
        let client = ApiClient::new("http://localhost:5000/api").unwrap();
        assert_eq!(
            client.endpoint("/donations/ticket-price").unwrap().as_str(),
            "http://localhost:5000/api/donations/ticket-price"
        );
        assert_eq!(
            client.endpoint("admin/donations/7/status").unwrap().as_str(),
            "http://localhost:5000/api/admin/donations/7/status"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(ApiClient::new("not a url").is_err());
        assert!(ApiClient::new("ftp://example.com/api").is_err());
    }

    #[test]
    fn timeouts_follow_config() {
        let config = Config {
            submission_timeout_secs: 12,
            reference_timeout_secs: 2,
            ..Config::default()
        };
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.submission_timeout(), Duration::from_secs(12));
        assert_eq!(client.reference_timeout(), Duration::from_secs(2));
    }
}
