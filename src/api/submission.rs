use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use uuid::Uuid;

use super::{check_status, ApiClient, ApiError};
use crate::core::attachment::AttachedFile;
use crate::core::form::{FormValues, FormVariant};
use crate::core::pricing::TicketCount;
use crate::domain::SubmissionRecord;

const SCREENSHOT_PART: &str = "screenshot";

/// Everything the backend needs to record one submission. Borrowed from the
/// wizard for the duration of the call.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub variant: FormVariant,
    pub values: &'a FormValues,
    pub tickets: Option<TicketCount>,
    pub amount: f64,
    pub screenshot: Option<&'a AttachedFile>,
    pub idempotency_key: Uuid,
}

impl Submission<'_> {
    /// Scalar multipart parts in send order.
    pub fn text_parts(&self) -> Vec<(&'static str, String)> {
        let mut parts: Vec<(&'static str, String)> = self
            .variant
            .fields()
            .into_iter()
            .filter_map(|field| {
                self.values
                    .get(field)
                    .map(|value| (field.key(), value.as_wire().trim().to_string()))
            })
            .collect();
        if let Some(tickets) = self.tickets {
            parts.push(("tickets", tickets.get().to_string()));
        }
        // Sent at full precision; rounding is a display concern.
        parts.push(("amount", self.amount.to_string()));
        parts
    }

    fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (key, value) in self.text_parts() {
            form = form.text(key, value);
        }
        if let Some(file) = self.screenshot {
            let part = Part::bytes(file.bytes().to_vec())
                .file_name(file.name().to_string())
                .mime_str(file.content_type())
                .map_err(|err| ApiError::Unexpected(format!("invalid attachment type: {err}")))?;
            form = form.part(SCREENSHOT_PART, part);
        }
        Ok(form)
    }
}

/// What the backend answered on success. Older deployments reply with just a
/// message, newer ones echo the stored record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionReceipt {
    pub record: Option<SubmissionRecord>,
    pub message: Option<String>,
}

impl SubmissionReceipt {
    pub fn from_body(body: &[u8]) -> Self {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let record = ["donation", "registration", "record"]
            .iter()
            .find_map(|key| value.get(*key))
            .or(Some(&value))
            .and_then(|candidate| serde_json::from_value(candidate.clone()).ok());
        Self { record, message }
    }
}

#[async_trait]
pub trait SubmissionClient: Send + Sync {
    async fn submit(&self, submission: Submission<'_>) -> Result<SubmissionReceipt, ApiError>;
}

/// Posts submissions as `multipart/form-data` to `POST /donations`.
#[derive(Debug, Clone)]
pub struct HttpSubmissionClient {
    api: ApiClient,
}

impl HttpSubmissionClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SubmissionClient for HttpSubmissionClient {
    async fn submit(&self, submission: Submission<'_>) -> Result<SubmissionReceipt, ApiError> {
        let url = self.api.endpoint("donations")?;
        let key = submission.idempotency_key.to_string();
        tracing::debug!(
            url = %url,
            variant = submission.variant.label(),
            amount = submission.amount,
            "submitting donation"
        );
        let form = submission.into_form()?;
        let response = self
            .api
            .http()
            .post(url)
            .header("Idempotency-Key", key)
            .timeout(self.api.submission_timeout())
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        let response = check_status(response).await?;
        let body = response.bytes().await.map_err(ApiError::from_transport)?;
        Ok(SubmissionReceipt::from_body(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::form::{Field, FieldValue};

    #[test]
    fn team_parts_use_backend_keys() {
        let mut values = FormValues::initial(FormVariant::TeamRegistration);
        values.set(Field::TeamName, FieldValue::Text(" Quizzards ".into()));
        values.set(Field::PreviousParticipation, FieldValue::Flag(true));
        let submission = Submission {
            variant: FormVariant::TeamRegistration,
            values: &values,
            tickets: None,
            amount: 40.0,
            screenshot: None,
            idempotency_key: Uuid::new_v4(),
        };
        let parts = submission.text_parts();
        assert!(parts.contains(&("teamName", "Quizzards".to_string())));
        assert!(parts.contains(&("participatedBefore", "true".to_string())));
        assert!(parts.contains(&("amount", "40".to_string())));
        assert!(parts.iter().all(|(key, _)| *key != "tickets"));
    }

    #[test]
    fn ticket_parts_include_count() {
        let values = FormValues::initial(FormVariant::TicketDonation);
        let submission = Submission {
            variant: FormVariant::TicketDonation,
            values: &values,
            tickets: Some(TicketCount::new(5)),
            amount: 10.0,
            screenshot: None,
            idempotency_key: Uuid::new_v4(),
        };
        let parts = submission.text_parts();
        assert!(parts.contains(&("tickets", "5".to_string())));
        assert!(parts.contains(&("paymentLinkUsed", String::new())));
    }

    #[test]
    fn amount_is_not_rounded_to_cents() {
        let values = FormValues::initial(FormVariant::TicketDonation);
        let submission = Submission {
            variant: FormVariant::TicketDonation,
            values: &values,
            tickets: Some(TicketCount::new(3)),
            amount: 3.0 * 2.125,
            screenshot: None,
            idempotency_key: Uuid::new_v4(),
        };
        let parts = submission.text_parts();
        assert!(parts.contains(&("amount", "6.375".to_string())));
    }

    #[test]
    fn receipt_accepts_wrapped_bare_and_message_only_bodies() {
        let wrapped = SubmissionReceipt::from_body(
            br#"{ "message": "ok", "donation": { "id": 9, "status": "pending" } }"#,
        );
        assert_eq!(wrapped.message.as_deref(), Some("ok"));
        assert_eq!(wrapped.record.map(|r| r.id.to_string()), Some("9".into()));

        let bare = SubmissionReceipt::from_body(br#"{ "id": "abc", "amount": 10 }"#);
        assert_eq!(bare.record.map(|r| r.amount), Some(10.0));

        let message_only = SubmissionReceipt::from_body(br#"{ "message": "Saved" }"#);
        assert!(message_only.record.is_none());
        assert!(SubmissionReceipt::from_body(b"").record.is_none());
    }
}
