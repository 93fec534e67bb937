use crate::api::HttpSubmissionClient;
use crate::cli::context::ShellContext;
use crate::cli::errors::{CommandError, CommandResult};
use crate::cli::forms::{run_donation, DonationFormRunner, FormResult, WizardInteraction};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::pricing_summary;
use crate::core::form::FormVariant;
use crate::core::wizard::DonationWizard;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "pricing",
            "Show current pricing and payment links",
            "pricing",
            cmd_pricing,
        ),
        CommandEntry::new(
            "refresh",
            "Reload pricing, settings and payment links",
            "refresh",
            cmd_refresh,
        ),
        CommandEntry::new(
            "donate",
            "Fill in and submit the donation or registration form",
            "donate [tickets|team]",
            cmd_donate,
        ),
    ]
}

fn cmd_pricing(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let money = context.money.clone();
    let reference = context.reference();
    output_section(&reference.settings.org_name);
    for line in pricing_summary(&reference.pricing, &money) {
        io::print_info(line);
    }
    if reference.links.is_empty() {
        io::print_warning("No payment links are active.");
    } else {
        io::print_info("Payment links:");
        for link in &reference.links {
            io::print_info(format!("  {} - {}", link.name, link.url));
        }
    }
    io::print_info(format!(
        "Questions? {} / {}",
        reference.settings.contact_phone, reference.settings.admin_email
    ));
    Ok(())
}

fn cmd_refresh(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let reference = context.refresh_reference();
    if reference.is_complete() {
        io::print_success(format!(
            "Reference data loaded ({} payment link(s)).",
            reference.links.len()
        ));
    } else {
        io::print_warning("Some reference data could not be loaded; defaults are in use.");
    }
    Ok(())
}

fn cmd_donate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = context.reference().clone();
    let variant = match args.first() {
        Some(raw) => FormVariant::parse(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "Unknown form `{}`. Use `tickets` or `team`.",
                raw
            ))
        })?,
        None => FormVariant::for_mode(reference.pricing.mode),
    };

    output_section(variant.label());
    for line in pricing_summary(&reference.pricing, &context.money) {
        io::print_info(line);
    }
    io::print_info("Answer each prompt; `:back`, `:help` and `:cancel` are available.");

    let client = HttpSubmissionClient::new(context.api.clone());
    let runner = DonationFormRunner::new(&reference.pricing, &reference.links, &context.money);
    let mut wizard = DonationWizard::new(variant);
    let mut interaction = WizardInteraction::new();
    let context: &ShellContext = context;
    let outcome = run_donation(&runner, &mut wizard, &mut interaction, |wizard| {
        context.block_on(wizard.submit(&client, &reference.pricing))
    });

    match outcome {
        FormResult::Completed(notification) => output::notify(&notification),
        FormResult::Cancelled => io::print_info("Form cancelled; nothing was submitted."),
    }
    Ok(())
}
