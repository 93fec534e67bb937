use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{split_labels, StatusUpdate, SubmissionRecord, SubmissionStatus};

/// Figures shown on the dashboard's stat cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub rejected: usize,
    /// Sum over confirmed submissions of the amount actually received, or
    /// the requested amount when none was recorded.
    pub confirmed_amount: f64,
}

impl DashboardStats {
    pub fn from_records(records: &[SubmissionRecord]) -> Self {
        records.iter().fold(
            DashboardStats {
                total: records.len(),
                ..DashboardStats::default()
            },
            |mut stats, record| {
                match record.status {
                    SubmissionStatus::Pending => stats.pending += 1,
                    SubmissionStatus::Confirmed => {
                        stats.confirmed += 1;
                        stats.confirmed_amount += record.effective_amount();
                    }
                    SubmissionStatus::Rejected => stats.rejected += 1,
                }
                stats
            },
        )
    }
}

/// Search box plus status dropdown of the submissions list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    search: String,
    status: Option<SubmissionStatus>,
}

impl SubmissionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into().trim().to_string();
        self
    }

    pub fn with_status(mut self, status: Option<SubmissionStatus>) -> Self {
        self.status = status;
        self
    }

    /// `all` clears the status filter.
    pub fn parse_status(raw: &str) -> Result<Option<SubmissionStatus>, String> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(None);
        }
        SubmissionStatus::parse(raw).map(Some).ok_or_else(|| {
            format!(
                "Unknown status `{}` (use all, pending, confirmed or rejected)",
                raw.trim()
            )
        })
    }

    /// Name and email match case-insensitively; phone matches as typed.
    pub fn matches(&self, record: &SubmissionRecord) -> bool {
        let matches_status = self.status.map_or(true, |status| record.status == status);
        if !matches_status {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        let name_hit = [record.full_name.as_deref(), record.team_name.as_deref()]
            .into_iter()
            .flatten()
            .any(|name| name.to_lowercase().contains(&needle));
        name_hit
            || record.email.to_lowercase().contains(&needle)
            || record.phone.contains(&self.search)
    }

    pub fn apply<'a>(&self, records: &'a [SubmissionRecord]) -> Vec<&'a SubmissionRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

/// Whole tickets covered by `amount`; zero when the price is not positive.
pub fn tickets_for_amount(amount: f64, ticket_price: f64) -> u32 {
    if ticket_price <= 0.0 || amount <= 0.0 {
        return 0;
    }
    (amount / ticket_price).floor() as u32
}

pub fn parse_ticket_numbers(raw: &str) -> Vec<String> {
    split_labels(raw)
}

/// File name used when saving the CSV export.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("donations-{}.csv", date.format("%Y-%m-%d"))
}

impl StatusUpdate {
    /// Editor defaults for `record`: its current status, the amount received
    /// (falling back to the requested one), the tickets already assigned or
    /// those the amount covers, and its ticket numbers.
    pub fn prefill(record: &SubmissionRecord, ticket_price: f64) -> Self {
        let amount = record.effective_amount();
        let tickets = record
            .tickets_assigned
            .filter(|assigned| *assigned > 0)
            .unwrap_or_else(|| tickets_for_amount(amount, ticket_price));
        Self {
            status: record.status,
            actual_amount: Some(amount),
            tickets_to_assign: Some(tickets),
            ticket_numbers: record.ticket_numbers.clone(),
        }
    }
}
