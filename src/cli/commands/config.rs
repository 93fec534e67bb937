use crate::cli::commands::split_subcommand;
use crate::cli::context::ShellContext;
use crate::cli::errors::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::render_details;
use crate::config::{API_URL_ENV, CONFIG_KEYS};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change local preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, "show");
    match sub.as_str() {
        "show" => {
            output_section("Configuration");
            let details: Vec<(String, String)> = context
                .config
                .entries()
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect();
            output::plain(render_details(&details));
            io::print_info(format!("Stored in {}", context.config_manager.path().display()));
            if let Some(url) = api_url_override(context) {
                io::print_info(format!("API URL overridden by {}: {}", API_URL_ENV, url));
            }
            Ok(())
        }
        "set" => {
            let [key, value @ ..] = rest.as_slice() else {
                return Err(usage());
            };
            if value.is_empty() {
                return Err(usage());
            }
            let mut config = context.config.clone();
            config
                .set_field(&key.to_ascii_lowercase(), &value.join(" "))
                .map_err(CommandError::InvalidArguments)?;
            context.apply_config(config)?;
            io::print_success(format!("`{}` updated.", key));
            if key.eq_ignore_ascii_case("api-url") {
                if let Some(url) = api_url_override(context) {
                    io::print_warning(format!(
                        "{} is set; this session keeps using {}.",
                        API_URL_ENV, url
                    ));
                }
            }
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "Unknown config action `{}`. Use `show` or `set`.",
            other
        ))),
    }
}

fn usage() -> CommandError {
    CommandError::InvalidArguments(format!(
        "usage: config set <{}> <value>",
        CONFIG_KEYS.join("|")
    ))
}

/// Base URL in use when the environment points the client somewhere other than the stored value.
fn api_url_override(context: &ShellContext) -> Option<String> {
    let effective = context.config.clone().with_env_overrides().api_base_url;
    (effective != context.config.api_base_url).then_some(effective)
}
