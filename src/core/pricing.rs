//! Derives the payable total shown by the form.
//!
//! Everything here is pure: amounts are kept unrounded and only formatted
//! when rendered.

use serde::{Deserialize, Serialize};

use crate::domain::{OrganizationSettings, PricingMode};

pub const MIN_TICKETS: u32 = 1;
pub const MAX_TICKETS: u32 = 50;

/// Ticket quantity clamped to `MIN_TICKETS..=MAX_TICKETS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketCount(u32);

impl TicketCount {
    pub fn new(requested: u32) -> Self {
        Self(requested.clamp(MIN_TICKETS, MAX_TICKETS))
    }

    /// Parses user input; non-numeric text yields `None`, out-of-range
    /// numbers are clamped.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim().parse::<i64>().ok()?;
        let bounded = value.clamp(MIN_TICKETS as i64, MAX_TICKETS as i64);
        Some(Self(bounded as u32))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for TicketCount {
    fn default() -> Self {
        Self(MIN_TICKETS)
    }
}

/// Read-only pricing snapshot used by the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub mode: PricingMode,
    pub ticket_price: f64,
    pub price_per_person: f64,
    pub price_per_team: f64,
    pub registration_fee: f64,
    pub description: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig::from(&OrganizationSettings::default())
    }
}

impl From<&OrganizationSettings> for PricingConfig {
    fn from(settings: &OrganizationSettings) -> Self {
        Self {
            mode: settings.pricing_mode,
            ticket_price: settings.ticket_price,
            price_per_person: settings.price_per_person,
            price_per_team: settings.price_per_team,
            registration_fee: settings.registration_fee,
            description: settings.pricing_description.clone(),
        }
    }
}

impl PricingConfig {
    /// Replaces the unit ticket price with the one published by the public
    /// endpoint.
    pub fn with_ticket_price(mut self, ticket_price: f64) -> Self {
        self.ticket_price = ticket_price;
        self
    }

    pub fn has_registration_fee(&self) -> bool {
        self.registration_fee > 0.0
    }
}

/// What the donor is paying for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Tickets(TicketCount),
    Team,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub label: String,
    pub amount: f64,
}

impl LineItem {
    fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub line_items: Vec<LineItem>,
    pub total: f64,
}

pub fn compute_total(config: &PricingConfig, selection: Selection) -> PriceBreakdown {
    match selection {
        Selection::Tickets(count) => {
            let count = count.get();
            let total = count as f64 * config.ticket_price;
            let label = if count == 1 {
                "1 ticket".to_string()
            } else {
                format!("{} tickets", count)
            };
            PriceBreakdown {
                line_items: vec![LineItem::new(label, total)],
                total,
            }
        }
        Selection::Team => {
            let mut line_items = vec![LineItem::new("Team entry", config.price_per_team)];
            let mut total = config.price_per_team;
            if config.has_registration_fee() {
                line_items.push(LineItem::new("Registration fee", config.registration_fee));
                total += config.registration_fee;
            }
            PriceBreakdown { line_items, total }
        }
    }
}
