use crate::cli::commands::{required_id, split_subcommand};
use crate::cli::context::{take_assume_yes, ShellContext};
use crate::cli::errors::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::links_table;
use crate::domain::{PaymentLink, PaymentLinkDraft, RecordId};

const USAGE: &str =
    "links [list|add <name> <url>|edit <id> <name> <url>|toggle <id>|delete <id> [--yes]]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new("links", "Manage payment links", USAGE, cmd_links).admin()]
}

fn cmd_links(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, "list");
    let changed = match sub.as_str() {
        "list" | "ls" => return list(context),
        "add" => add(context, &rest)?,
        "edit" => edit(context, &rest)?,
        "toggle" => toggle(context, &rest)?,
        "delete" | "rm" => delete(context, &rest)?,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "Unknown links action `{}`. Usage: {}",
                other, USAGE
            )))
        }
    };
    // The public form only offers active links; reload them on next use.
    if changed {
        context.reference = None;
    }
    Ok(())
}

fn list(context: &mut ShellContext) -> CommandResult {
    let admin = context.admin()?;
    let links = context.block_on(admin.list_links())?;
    output_section(format!("Payment links ({})", links.len()));
    if links.is_empty() {
        io::print_info("No payment links yet. Use `links add <name> <url>`.");
        return Ok(());
    }
    output::plain(links_table(&links).render());
    Ok(())
}

/// Name and URL from `<name words...> <url>`; the URL is the last argument.
fn draft_from(args: &[&str], usage: &str) -> Result<PaymentLinkDraft, CommandError> {
    let [name @ .., url] = args else {
        return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
    };
    if name.is_empty() {
        return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
    }
    let draft = PaymentLinkDraft::new(name.join(" "), url.trim());
    draft.validate().map_err(CommandError::InvalidArguments)?;
    Ok(draft)
}

fn add(context: &mut ShellContext, args: &[&str]) -> Result<bool, CommandError> {
    let draft = draft_from(args, "links add <name> <url>")?;
    let admin = context.admin()?;
    context.block_on(admin.create_link(&draft))?;
    io::print_success(format!("Payment link `{}` added.", draft.name));
    Ok(true)
}

fn edit(context: &mut ShellContext, args: &[&str]) -> Result<bool, CommandError> {
    let usage = "links edit <id> <name> <url>";
    let id = required_id(args, usage)?;
    let current = find_link(context, &id)?;
    let mut draft = draft_from(&args[1..], usage)?;
    draft.is_active = current.is_active;
    let admin = context.admin()?;
    context.block_on(admin.update_link(&id, &draft))?;
    io::print_success(format!("Payment link {} updated.", id));
    Ok(true)
}

fn toggle(context: &mut ShellContext, args: &[&str]) -> Result<bool, CommandError> {
    let id = required_id(args, "links toggle <id>")?;
    let link = find_link(context, &id)?;
    let admin = context.admin()?;
    let active = context.block_on(admin.toggle_link(&link))?;
    let state = if active { "active" } else { "inactive" };
    io::print_success(format!("Payment link `{}` is now {}.", link.name, state));
    Ok(true)
}

fn delete(context: &mut ShellContext, args: &[&str]) -> Result<bool, CommandError> {
    let (assume_yes, args) = take_assume_yes(args);
    let id = required_id(&args, "links delete <id> [--yes]")?;
    let prompt = format!("Delete payment link {}?", id);
    if !context.confirm_destructive(&prompt, assume_yes)? {
        io::print_info("Nothing deleted.");
        return Ok(false);
    }
    let admin = context.admin()?;
    context.block_on(admin.delete_link(&id))?;
    io::print_success(format!("Payment link {} deleted.", id));
    Ok(true)
}

fn find_link(context: &ShellContext, id: &RecordId) -> Result<PaymentLink, CommandError> {
    let admin = context.admin()?;
    context
        .block_on(admin.list_links())?
        .into_iter()
        .find(|link| &link.id == id)
        .ok_or_else(|| CommandError::Message(format!("No payment link with ID {}.", id)))
}
