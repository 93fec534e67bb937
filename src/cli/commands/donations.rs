use std::fs;
use std::path::PathBuf;

use chrono::Local;

use crate::cli::commands::{flag_value, required_id, split_subcommand};
use crate::cli::context::{take_assume_yes, CliMode, ShellContext};
use crate::cli::errors::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::{
    render_details, stats_lines, submission_details, submissions_table,
};
use crate::core::services::{export_file_name, parse_ticket_numbers, DashboardStats, SubmissionFilter};
use crate::domain::{RecordId, StatusUpdate, SubmissionRecord, SubmissionStatus};

const USAGE: &str = "donations [list [--search <text>] [--status <status>]|show <id>|status <id> <status> [amount] [tickets] [numbers]|delete <id> [--yes]|export [path]|stats]";
const STATUS_USAGE: &str = "donations status <id> <pending|confirmed|rejected> [amount] [tickets] [numbers]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "donations",
        "Review, confirm and export submissions",
        USAGE,
        cmd_donations,
    )
    .admin()]
}

fn cmd_donations(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, "list");
    match sub.as_str() {
        "list" | "ls" => list(context, &rest),
        "show" => show(context, &rest),
        "status" => update_status(context, &rest),
        "delete" | "rm" => delete(context, &rest),
        "export" => export(context, &rest),
        "stats" => stats(context),
        other => Err(CommandError::InvalidArguments(format!(
            "Unknown donations action `{}`. Usage: {}",
            other, USAGE
        ))),
    }
}

fn fetch_records(context: &ShellContext) -> Result<Vec<SubmissionRecord>, CommandError> {
    let admin = context.admin()?;
    let limit = context.config.donation_list_limit;
    Ok(context.block_on(admin.list_submissions(limit))?)
}

fn find_record(context: &ShellContext, id: &RecordId) -> Result<SubmissionRecord, CommandError> {
    fetch_records(context)?
        .into_iter()
        .find(|record| &record.id == id)
        .ok_or_else(|| CommandError::Message(format!("No submission with ID {}.", id)))
}

fn list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut filter = SubmissionFilter::new();
    if let Some(search) = flag_value(args, "--search")? {
        filter = filter.with_search(search);
    }
    if let Some(status) = flag_value(args, "--status")? {
        let status = SubmissionFilter::parse_status(status).map_err(CommandError::InvalidArguments)?;
        filter = filter.with_status(status);
    }

    let records = fetch_records(context)?;
    let visible = filter.apply(&records);
    output_section(format!("Submissions ({} of {})", visible.len(), records.len()));
    if visible.is_empty() {
        io::print_info("No submissions match.");
        return Ok(());
    }
    output::plain(submissions_table(&visible, &context.money).render());
    Ok(())
}

fn show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = required_id(args, "donations show <id>")?;
    let record = find_record(context, &id)?;
    output_section(format!("Submission {}", record.id));
    output::plain(render_details(&submission_details(&record, &context.money)));
    Ok(())
}

fn update_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = required_id(args, STATUS_USAGE)?;
    let raw_status = args
        .get(1)
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", STATUS_USAGE)))?;
    let status = SubmissionStatus::parse(raw_status).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "Unknown status `{}`. Use pending, confirmed or rejected.",
            raw_status
        ))
    })?;

    let ticket_price = context.reference().pricing.ticket_price;
    let record = find_record(context, &id)?;
    let mut update = StatusUpdate::prefill(&record, ticket_price);
    update.status = status;
    if let Some(raw) = args.get(2) {
        let amount = raw.trim().parse::<f64>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{}` is not a valid amount", raw))
        })?;
        update.actual_amount = Some(amount);
    }
    if let Some(raw) = args.get(3) {
        let tickets = raw.trim().parse::<u32>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{}` is not a whole number of tickets", raw))
        })?;
        update.tickets_to_assign = Some(tickets);
    }
    if args.len() > 4 {
        update.ticket_numbers = parse_ticket_numbers(&args[4..].join(","));
    }
    update.validate().map_err(CommandError::InvalidArguments)?;

    if context.mode == CliMode::Interactive {
        output_section(format!("Update {} ({})", record.display_name(), record.id));
        output::plain(render_details(&update_details(&update, context)));
        if !io::confirm_action(&context.theme, "Send this update?", true)? {
            io::print_info("Update discarded.");
            return Ok(());
        }
    }

    let admin = context.admin()?;
    context.block_on(admin.update_status(&id, &update))?;
    io::print_success(format!("Submission {} marked {}.", id, status));
    Ok(())
}

fn update_details(update: &StatusUpdate, context: &ShellContext) -> Vec<(String, String)> {
    vec![
        ("Status".to_string(), update.status.label().to_string()),
        (
            "Received".to_string(),
            update
                .actual_amount
                .map(|amount| context.money.format(amount))
                .unwrap_or_else(|| "-".into()),
        ),
        (
            "Tickets".to_string(),
            update
                .tickets_to_assign
                .map(|tickets| tickets.to_string())
                .unwrap_or_else(|| "-".into()),
        ),
        ("Ticket numbers".to_string(), update.ticket_numbers.join(", ")),
    ]
}

fn delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (assume_yes, args) = take_assume_yes(args);
    let id = required_id(&args, "donations delete <id> [--yes]")?;
    let prompt = format!("Delete submission {}? This cannot be undone.", id);
    if !context.confirm_destructive(&prompt, assume_yes)? {
        io::print_info("Nothing deleted.");
        return Ok(());
    }
    let admin = context.admin()?;
    context.block_on(admin.delete_submission(&id))?;
    io::print_success(format!("Submission {} deleted.", id));
    Ok(())
}

fn export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let file_name = export_file_name(Local::now().date_naive());
    let target = match args.first() {
        Some(raw) => {
            let path = PathBuf::from(raw);
            if path.is_dir() {
                path.join(&file_name)
            } else {
                path
            }
        }
        None => context
            .config
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(&file_name),
    };

    let admin = context.admin()?;
    let bytes = context.block_on(admin.export_csv())?;
    if let Some(parent) = target.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, &bytes)?;
    tracing::info!(path = %target.display(), bytes = bytes.len(), "exported submissions");
    io::print_success(format!("Exported submissions to {}.", target.display()));
    Ok(())
}

fn stats(context: &mut ShellContext) -> CommandResult {
    let records = fetch_records(context)?;
    let stats = DashboardStats::from_records(&records);
    output_section("Dashboard");
    for line in stats_lines(&stats, &context.money) {
        io::print_info(line);
    }
    Ok(())
}
