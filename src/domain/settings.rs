use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::common::amount;

/// How the public form charges a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingMode {
    /// Donation priced by ticket count.
    PerTicket,
    /// Registration priced per team plus an optional flat fee.
    #[default]
    PerTeam,
}

impl PricingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingMode::PerTicket => "per_ticket",
            PricingMode::PerTeam => "per_team",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "per_ticket" | "ticket" | "tickets" => Some(PricingMode::PerTicket),
            "per_team" | "team" => Some(PricingMode::PerTeam),
            _ => None,
        }
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PricingMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PricingMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(PricingMode::parse(&raw).unwrap_or_else(|| {
            tracing::warn!(mode = %raw, "unknown pricing mode, falling back to default");
            PricingMode::default()
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub url: String,
    #[serde(default)]
    pub public_id: String,
}

/// Organization-wide configuration edited from the dashboard and read by the
/// public form. Every field falls back to its default when the backend omits
/// it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganizationSettings {
    pub contact_phone: String,
    pub admin_email: String,
    pub org_name: String,
    pub pricing_mode: PricingMode,
    #[serde(deserialize_with = "amount::deserialize")]
    pub ticket_price: f64,
    #[serde(deserialize_with = "amount::deserialize")]
    pub price_per_person: f64,
    #[serde(deserialize_with = "amount::deserialize")]
    pub price_per_team: f64,
    #[serde(deserialize_with = "amount::deserialize")]
    pub registration_fee: f64,
    pub pricing_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub banners: Vec<Banner>,
}

impl Default for OrganizationSettings {
    fn default() -> Self {
        Self {
            contact_phone: "+3XXXXXXXXX".into(),
            admin_email: "admin@example.com".into(),
            org_name: "Your Organization".into(),
            pricing_mode: PricingMode::PerTeam,
            ticket_price: 2.0,
            price_per_person: 10.0,
            price_per_team: 20.0,
            registration_fee: 20.0,
            pricing_description: "1 team = €20.00 (€10 per person), Registration fee: €20.00"
                .into(),
            logo_url: None,
            banners: Vec::new(),
        }
    }
}

/// Keys accepted by [`OrganizationSettings::set_field`].
pub const EDITABLE_SETTINGS: &[&str] = &[
    "contact-phone",
    "admin-email",
    "org-name",
    "pricing-mode",
    "ticket-price",
    "price-per-person",
    "price-per-team",
    "registration-fee",
    "pricing-description",
];

impl OrganizationSettings {
    /// Updates a single editable field from its textual form.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        match key {
            "contact-phone" => self.contact_phone = value.to_string(),
            "admin-email" => self.admin_email = value.to_string(),
            "org-name" => self.org_name = value.to_string(),
            "pricing-description" => self.pricing_description = value.to_string(),
            "pricing-mode" => {
                self.pricing_mode = PricingMode::parse(value)
                    .ok_or_else(|| format!("Unknown pricing mode `{}`", value))?;
            }
            "ticket-price" => self.ticket_price = parse_price(value)?,
            "price-per-person" => self.price_per_person = parse_price(value)?,
            "price-per-team" => self.price_per_team = parse_price(value)?,
            "registration-fee" => self.registration_fee = parse_price(value)?,
            other => {
                return Err(format!(
                    "Unknown setting `{}` (editable: {})",
                    other,
                    EDITABLE_SETTINGS.join(", ")
                ))
            }
        }
        Ok(())
    }
}

fn parse_price(value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .map_err(|_| "Enter a numeric amount".to_string())
        .and_then(|amount| {
            if !amount.is_finite() {
                Err("Enter a numeric amount".into())
            } else if amount < 0.0 {
                Err("Amount must be zero or positive".into())
            } else {
                Ok(amount)
            }
        })
}

/// Payload of `GET /donations/ticket-price`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPrice {
    #[serde(deserialize_with = "amount::deserialize")]
    pub ticket_price: f64,
}
