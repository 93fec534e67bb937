use serde::{Deserialize, Serialize};

use super::common::RecordId;

/// A destination the donor pays through before uploading proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
    pub id: RecordId,
    pub name: String,
    pub url: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Body of the create/update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkDraft {
    pub name: String,
    pub url: String,
    pub is_active: bool,
}

impl PaymentLinkDraft {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            is_active: true,
        }
    }

    /// Checks the draft before it is sent; the URL must be absolute http(s).
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Link name is required".into());
        }
        let parsed = url::Url::parse(self.url.trim())
            .map_err(|_| format!("`{}` is not a valid URL", self.url.trim()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err("Payment links must use http or https".into());
        }
        Ok(())
    }
}

impl PaymentLink {
    pub fn draft(&self) -> PaymentLinkDraft {
        PaymentLinkDraft {
            name: self.name.clone(),
            url: self.url.clone(),
            is_active: self.is_active,
        }
    }

    /// Draft with the active flag flipped, as sent by the toggle action.
    pub fn toggled(&self) -> PaymentLinkDraft {
        PaymentLinkDraft {
            is_active: !self.is_active,
            ..self.draft()
        }
    }
}
