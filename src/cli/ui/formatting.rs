//! Text renderings of domain values shared by the command handlers.

use crate::cli::ui::table_renderer::{Table, TableColumn};
use crate::core::pricing::{PriceBreakdown, PricingConfig};
use crate::core::services::DashboardStats;
use crate::currency::{format_timestamp, MoneyFormat};
use crate::domain::{OrganizationSettings, PaymentLink, PricingMode, SubmissionRecord};

pub fn breakdown_lines(breakdown: &PriceBreakdown, money: &MoneyFormat) -> Vec<String> {
    let mut lines: Vec<String> = breakdown
        .line_items
        .iter()
        .map(|item| format!("  {:<20} {}", item.label, money.format(item.amount)))
        .collect();
    lines.push(format!("  {:<20} {}", "Total", money.format(breakdown.total)));
    lines
}

/// Human summary of the active pricing, as shown above the form.
pub fn pricing_summary(pricing: &PricingConfig, money: &MoneyFormat) -> Vec<String> {
    let mut lines = Vec::new();
    match pricing.mode {
        PricingMode::PerTicket => {
            lines.push(format!("Ticket price: {}", money.format(pricing.ticket_price)));
        }
        PricingMode::PerTeam => {
            lines.push(format!(
                "Team entry: {} ({} per person)",
                money.format(pricing.price_per_team),
                money.format(pricing.price_per_person)
            ));
            if pricing.has_registration_fee() {
                lines.push(format!(
                    "Registration fee: {}",
                    money.format(pricing.registration_fee)
                ));
            }
        }
    }
    if !pricing.description.trim().is_empty() {
        lines.push(pricing.description.clone());
    }
    lines
}

pub fn submissions_table(records: &[&SubmissionRecord], money: &MoneyFormat) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Date"),
        TableColumn::left("Name").max(25),
        TableColumn::left("Email").max(30),
        TableColumn::right("Amount"),
        TableColumn::right("Tickets"),
        TableColumn::left("Status"),
    ]);
    for record in records {
        table.push_row(vec![
            record.id.to_string(),
            record
                .created_at
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_else(|| "-".into()),
            record.display_name().to_string(),
            record.email.clone(),
            money.format(record.effective_amount()),
            ticket_cell(record),
            record.status.label().to_string(),
        ]);
    }
    table
}

fn ticket_cell(record: &SubmissionRecord) -> String {
    match (record.tickets_assigned, record.tickets) {
        (Some(assigned), _) if assigned > 0 => assigned.to_string(),
        (_, Some(requested)) => requested.to_string(),
        _ => "-".into(),
    }
}

/// Label/value pairs for the detail view of one submission.
pub fn submission_details(record: &SubmissionRecord, money: &MoneyFormat) -> Vec<(String, String)> {
    let mut details = vec![("ID".to_string(), record.id.to_string())];
    let mut push = |label: &str, value: Option<String>| {
        if let Some(value) = value.filter(|value| !value.trim().is_empty()) {
            details.push((label.to_string(), value));
        }
    };
    push("Name", record.full_name.clone());
    push("Team", record.team_name.clone());
    push("Team ID", record.team_id.clone());
    push("Email", Some(record.email.clone()));
    push("Phone", Some(record.phone.clone()));
    push("Location", record.location.clone());
    push("Amount", Some(money.format(record.amount)));
    push("Received", record.actual_amount.map(|amount| money.format(amount)));
    push("Tickets", record.tickets.map(|tickets| tickets.to_string()));
    push(
        "Assigned",
        record.tickets_assigned.map(|tickets| tickets.to_string()),
    );
    push("Ticket numbers", Some(record.ticket_numbers.join(", ")));
    push("Status", Some(record.status.label().to_string()));
    push("Paid via", record.payment_link_used.clone());
    push("Screenshot", record.screenshot_url.clone());
    push("Submitted", record.created_at.as_ref().map(format_timestamp));
    details
}

pub fn render_details(details: &[(String, String)]) -> String {
    let width = details
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    details
        .iter()
        .map(|(label, value)| format!("  {:<width$}  {}", label, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stats_lines(stats: &DashboardStats, money: &MoneyFormat) -> Vec<String> {
    vec![
        format!("Total submissions: {}", stats.total),
        format!("Pending:           {}", stats.pending),
        format!("Confirmed:         {}", stats.confirmed),
        format!("Rejected:          {}", stats.rejected),
        format!("Confirmed amount:  {}", money.format(stats.confirmed_amount)),
    ]
}

pub fn links_table(links: &[PaymentLink]) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Name").max(30),
        TableColumn::left("URL").max(50),
        TableColumn::left("Active"),
    ]);
    for link in links {
        table.push_row(vec![
            link.id.to_string(),
            link.name.clone(),
            link.url.clone(),
            if link.is_active { "yes" } else { "no" }.to_string(),
        ]);
    }
    table
}

pub fn settings_details(settings: &OrganizationSettings, money: &MoneyFormat) -> Vec<(String, String)> {
    let mut details = vec![
        ("org-name", settings.org_name.clone()),
        ("admin-email", settings.admin_email.clone()),
        ("contact-phone", settings.contact_phone.clone()),
        ("pricing-mode", settings.pricing_mode.to_string()),
        ("ticket-price", money.format(settings.ticket_price)),
        ("price-per-person", money.format(settings.price_per_person)),
        ("price-per-team", money.format(settings.price_per_team)),
        ("registration-fee", money.format(settings.registration_fee)),
        ("pricing-description", settings.pricing_description.clone()),
        (
            "logo",
            settings.logo_url.clone().unwrap_or_else(|| "(none)".into()),
        ),
    ];
    for banner in &settings.banners {
        details.push(("banner", format!("{} [{}]", banner.url, banner.public_id)));
    }
    details
        .into_iter()
        .map(|(label, value)| (label.to_string(), value))
        .collect()
}
