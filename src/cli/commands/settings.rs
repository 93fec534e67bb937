use std::path::Path;

use crate::cli::commands::split_subcommand;
use crate::cli::context::{take_assume_yes, ShellContext};
use crate::cli::errors::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::{render_details, settings_details};
use crate::core::attachment::AttachedFile;
use crate::domain::{Banner, EDITABLE_SETTINGS};

const USAGE: &str = "settings [show|set <key> <value>|upload-logo <path>|upload-banner <path>|remove-banner <publicId> [--yes]]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "settings",
        "View and edit organization settings",
        USAGE,
        cmd_settings,
    )
    .admin()]
}

fn cmd_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, "show");
    match sub.as_str() {
        "show" => show(context),
        "set" => set(context, &rest),
        "upload-logo" => upload_logo(context, &rest),
        "upload-banner" => upload_banner(context, &rest),
        "remove-banner" => remove_banner(context, &rest),
        other => Err(CommandError::InvalidArguments(format!(
            "Unknown settings action `{}`. Usage: {}",
            other, USAGE
        ))),
    }
}

fn show(context: &mut ShellContext) -> CommandResult {
    let admin = context.admin()?;
    let settings = context.block_on(admin.settings())?;
    output_section("Organization settings");
    output::plain(render_details(&settings_details(&settings, &context.money)));
    Ok(())
}

fn set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, value @ ..] = args else {
        return Err(set_usage());
    };
    if value.is_empty() {
        return Err(set_usage());
    }
    let admin = context.admin()?;
    let mut settings = context.block_on(admin.settings())?;
    settings
        .set_field(&key.to_ascii_lowercase(), &value.join(" "))
        .map_err(CommandError::InvalidArguments)?;
    context.block_on(admin.update_settings(&settings))?;
    context.reference = None;
    io::print_success(format!("`{}` saved.", key));
    Ok(())
}

fn set_usage() -> CommandError {
    CommandError::InvalidArguments(format!(
        "usage: settings set <{}> <value>",
        EDITABLE_SETTINGS.join("|")
    ))
}

fn image_arg(args: &[&str], usage: &str) -> Result<AttachedFile, CommandError> {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))?;
    Ok(AttachedFile::from_path(Path::new(raw))?)
}

fn upload_logo(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let file = image_arg(args, "settings upload-logo <path>")?;
    let admin = context.admin()?;
    let url = context.block_on(admin.upload_logo(&file))?;
    context.reference = None;
    match url {
        Some(url) => io::print_success(format!("Logo uploaded: {}", url)),
        None => io::print_success(format!("Logo {} uploaded.", file.name())),
    }
    Ok(())
}

fn upload_banner(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let file = image_arg(args, "settings upload-banner <path>")?;
    let admin = context.admin()?;
    let banners = context.block_on(admin.upload_banner(&file))?;
    context.reference = None;
    io::print_success(format!("Banner {} uploaded.", file.name()));
    print_banners(&banners);
    Ok(())
}

fn remove_banner(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (assume_yes, args) = take_assume_yes(args);
    let public_id = args
        .first()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            CommandError::InvalidArguments(
                "usage: settings remove-banner <publicId> [--yes]".into(),
            )
        })?;
    let prompt = format!("Remove banner {}?", public_id);
    if !context.confirm_destructive(&prompt, assume_yes)? {
        io::print_info("Banner kept.");
        return Ok(());
    }
    let admin = context.admin()?;
    let banners = context.block_on(admin.remove_banner(public_id))?;
    context.reference = None;
    io::print_success(format!("Banner {} removed.", public_id));
    print_banners(&banners);
    Ok(())
}

fn print_banners(banners: &[Banner]) {
    if banners.is_empty() {
        io::print_info("No banners configured.");
        return;
    }
    for banner in banners {
        io::print_info(format!("  {} [{}]", banner.url, banner.public_id));
    }
}
