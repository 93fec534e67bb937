use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::common::{amount, label_list, optional_amount, RecordId};

/// Review state of a submission; owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Confirmed,
    Rejected,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 3] = [
        SubmissionStatus::Pending,
        SubmissionStatus::Confirmed,
        SubmissionStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Confirmed => "confirmed",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Confirmed => "Confirmed",
            SubmissionStatus::Rejected => "Rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SubmissionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(SubmissionStatus::parse(&raw).unwrap_or_default())
    }
}

/// A donation or registration as stored by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: RecordId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub amount: f64,
    #[serde(default, deserialize_with = "optional_amount::deserialize")]
    pub actual_amount: Option<f64>,
    #[serde(default)]
    pub tickets: Option<u32>,
    #[serde(default)]
    pub tickets_assigned: Option<u32>,
    #[serde(default, deserialize_with = "label_list::deserialize")]
    pub ticket_numbers: Vec<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub status: SubmissionStatus,
    #[serde(default)]
    pub payment_link_used: Option<String>,
    #[serde(default)]
    pub screenshot_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SubmissionRecord {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.team_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("(unnamed)")
    }

    /// Amount actually received when recorded, otherwise the requested amount.
    pub fn effective_amount(&self) -> f64 {
        self.actual_amount.unwrap_or(self.amount)
    }
}

/// Listing payload; older backends return a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubmissionPage {
    Paged {
        rows: Vec<SubmissionRecord>,
        #[serde(default)]
        count: Option<u64>,
    },
    Bare(Vec<SubmissionRecord>),
}

impl SubmissionPage {
    pub fn into_rows(self) -> Vec<SubmissionRecord> {
        match self {
            SubmissionPage::Paged { rows, .. } | SubmissionPage::Bare(rows) => rows,
        }
    }
}

/// Body of `PATCH /admin/donations/:id/status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickets_to_assign: Option<u32>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "label_list::serialize"
    )]
    pub ticket_numbers: Vec<String>,
}

impl StatusUpdate {
    pub fn new(status: SubmissionStatus) -> Self {
        Self {
            status,
            actual_amount: None,
            tickets_to_assign: None,
            ticket_numbers: Vec::new(),
        }
    }

    /// Confirming requires a non-negative amount actually received.
    pub fn validate(&self) -> Result<(), String> {
        if self.status != SubmissionStatus::Confirmed {
            return Ok(());
        }
        match self.actual_amount {
            Some(amount) if !amount.is_finite() => Err("Actual amount must be a number".into()),
            Some(amount) if amount >= 0.0 => Ok(()),
            Some(_) => Err("Actual amount must be zero or positive".into()),
            None => Err("Actual amount is required when confirming".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_record() {
        let record: SubmissionRecord = serde_json::from_str(
            r#"{
                "id": 12,
                "fullName": "Ana Horvat",
                "email": "ana@example.com",
                "phone": "0911234567",
                "amount": "10.00",
                "actualAmount": null,
                "ticketNumbers": [101, "102"],
                "status": "confirmed",
                "createdAt": "2025-03-01T10:15:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(record.id.as_str(), "12");
        assert_eq!(record.display_name(), "Ana Horvat");
        assert_eq!(record.effective_amount(), 10.0);
        assert_eq!(record.ticket_numbers, vec!["101", "102"]);
        assert_eq!(record.status, SubmissionStatus::Confirmed);
    }

    #[test]
    fn unknown_status_reads_as_pending() {
        let record: SubmissionRecord =
            serde_json::from_str(r#"{ "id": 1, "status": "archived" }"#).unwrap();
        assert_eq!(record.status, SubmissionStatus::Pending);
        assert_eq!(record.display_name(), "(unnamed)");
    }

    #[test]
    fn page_accepts_both_shapes() {
        let paged: SubmissionPage =
            serde_json::from_str(r#"{ "rows": [{ "id": 1 }], "count": 1 }"#).unwrap();
        assert_eq!(paged.into_rows().len(), 1);
        let bare: SubmissionPage = serde_json::from_str(r#"[{ "id": 1 }, { "id": 2 }]"#).unwrap();
        assert_eq!(bare.into_rows().len(), 2);
    }

    #[test]
    fn status_update_serializes_ticket_numbers_as_text() {
        let update = StatusUpdate {
            status: SubmissionStatus::Confirmed,
            actual_amount: Some(10.0),
            tickets_to_assign: Some(5),
            ticket_numbers: vec!["1".into(), "2".into()],
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["status"], "confirmed");
        assert_eq!(json["actualAmount"], 10.0);
        assert_eq!(json["ticketsToAssign"], 5);
        assert_eq!(json["ticketNumbers"], "1, 2");
    }

    #[test]
    fn confirming_requires_amount() {
        let mut update = StatusUpdate::new(SubmissionStatus::Confirmed);
        assert!(update.validate().is_err());
        update.actual_amount = Some(0.0);
        assert!(update.validate().is_ok());
        assert!(StatusUpdate::new(SubmissionStatus::Rejected).validate().is_ok());
    }

    #[test]
    fn confirming_rejects_non_finite_amount() {
        let mut update = StatusUpdate::new(SubmissionStatus::Confirmed);
        update.actual_amount = Some(f64::INFINITY);
        assert!(update.validate().is_err());
        update.actual_amount = Some(f64::NAN);
        assert!(update.validate().is_err());
    }
}
