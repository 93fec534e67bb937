use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::auth::AdminSession;
use super::{check_status, read_json, ApiClient, ApiError};
use crate::core::attachment::AttachedFile;
use crate::domain::{
    Banner, OrganizationSettings, PaymentLink, PaymentLinkDraft, RecordId, StatusUpdate,
    SubmissionPage, SubmissionRecord,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogoResponse {
    #[serde(default)]
    logo_url: Option<String>,
}

#[derive(Deserialize)]
struct BannersResponse {
    #[serde(default)]
    banners: Vec<Banner>,
}

/// Dashboard calls, authenticated with the session's bearer token.
#[derive(Debug, Clone)]
pub struct AdminClient {
    api: ApiClient,
    session: AdminSession,
}

impl AdminClient {
    pub fn new(api: ApiClient, session: AdminSession) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &AdminSession {
        &self.session
    }

    pub async fn list_submissions(&self, limit: u32) -> Result<Vec<SubmissionRecord>, ApiError> {
        let builder = self
            .request(Method::GET, "admin/donations")?
            .query(&[("limit", limit)]);
        let page: SubmissionPage = self.fetch_json(builder).await?;
        Ok(page.into_rows())
    }

    pub async fn update_status(&self, id: &RecordId, update: &StatusUpdate) -> Result<(), ApiError> {
        let path = format!("admin/donations/{}/status", id);
        let builder = self.request(Method::PATCH, &path)?.json(update);
        self.execute(builder).await.map(drop)
    }

    /// Callers must have confirmed the deletion with the user first.
    pub async fn delete_submission(&self, id: &RecordId) -> Result<(), ApiError> {
        let path = format!("admin/donations/{}", id);
        let builder = self.request(Method::DELETE, &path)?;
        self.execute(builder).await.map(drop)
    }

    pub async fn export_csv(&self) -> Result<Vec<u8>, ApiError> {
        let builder = self.request(Method::GET, "admin/donations/export")?;
        let response = self.execute(builder).await?;
        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        Ok(bytes.to_vec())
    }

    pub async fn list_links(&self) -> Result<Vec<PaymentLink>, ApiError> {
        let builder = self.request(Method::GET, "payment-links")?;
        self.fetch_json(builder).await
    }

    pub async fn create_link(&self, draft: &PaymentLinkDraft) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, "payment-links")?.json(draft);
        self.execute(builder).await.map(drop)
    }

    pub async fn update_link(&self, id: &RecordId, draft: &PaymentLinkDraft) -> Result<(), ApiError> {
        let path = format!("payment-links/{}", id);
        let builder = self.request(Method::PUT, &path)?.json(draft);
        self.execute(builder).await.map(drop)
    }

    /// Flips the active flag and returns the new state.
    pub async fn toggle_link(&self, link: &PaymentLink) -> Result<bool, ApiError> {
        let draft = link.toggled();
        self.update_link(&link.id, &draft).await?;
        Ok(draft.is_active)
    }

    pub async fn delete_link(&self, id: &RecordId) -> Result<(), ApiError> {
        let path = format!("payment-links/{}", id);
        let builder = self.request(Method::DELETE, &path)?;
        self.execute(builder).await.map(drop)
    }

    pub async fn settings(&self) -> Result<OrganizationSettings, ApiError> {
        let builder = self.request(Method::GET, "admin/settings")?;
        let settings: Option<OrganizationSettings> = self.fetch_json(builder).await?;
        Ok(settings.unwrap_or_default())
    }

    pub async fn update_settings(&self, settings: &OrganizationSettings) -> Result<(), ApiError> {
        let builder = self.request(Method::PUT, "admin/settings")?.json(settings);
        self.execute(builder).await.map(drop)
    }

    /// Uploads a new logo; returns its hosted URL when the backend reports it.
    pub async fn upload_logo(&self, file: &AttachedFile) -> Result<Option<String>, ApiError> {
        let form = Form::new().part("logo", image_part(file)?);
        let builder = self.request(Method::POST, "admin/upload-logo")?.multipart(form);
        let body: LogoResponse = self.fetch_json(builder).await?;
        Ok(body.logo_url)
    }

    /// Adds a banner and returns the updated banner list.
    pub async fn upload_banner(&self, file: &AttachedFile) -> Result<Vec<Banner>, ApiError> {
        let form = Form::new().part("banner", image_part(file)?);
        let builder = self.request(Method::POST, "admin/upload-banner")?.multipart(form);
        let body: BannersResponse = self.fetch_json(builder).await?;
        Ok(body.banners)
    }

    pub async fn remove_banner(&self, public_id: &str) -> Result<Vec<Banner>, ApiError> {
        let builder = self
            .request(Method::POST, "admin/remove-banner")?
            .json(&serde_json::json!({ "publicId": public_id }));
        let body: BannersResponse = self.fetch_json(builder).await?;
        Ok(body.banners)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.api.endpoint(path)?;
        tracing::debug!(method = %method, url = %url, "admin request");
        Ok(self
            .api
            .http()
            .request(method, url)
            .bearer_auth(self.session.token())
            .timeout(self.api.submission_timeout()))
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(ApiError::from_transport)?;
        check_status(response).await
    }

    async fn fetch_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(ApiError::from_transport)?;
        read_json(response).await
    }
}

fn image_part(file: &AttachedFile) -> Result<Part, ApiError> {
    Part::bytes(file.bytes().to_vec())
        .file_name(file.name().to_string())
        .mime_str(file.content_type())
        .map_err(|err| ApiError::Unexpected(format!("invalid attachment type: {err}")))
}
