use crate::api::AuthClient;
use crate::cli::context::{CliMode, ShellContext};
use crate::cli::errors::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::prompts::{text_input, TextPromptResult};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "login",
            "Sign in to the admin dashboard",
            "login <username>",
            cmd_login,
        ),
        CommandEntry::new("logout", "End the admin session", "logout", cmd_logout),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let username = match args.first() {
        Some(name) => name.trim().to_string(),
        None if context.mode == CliMode::Interactive => {
            io::prompt_text(&context.theme, "Username")?.trim().to_string()
        }
        None => {
            return Err(CommandError::InvalidArguments(
                "usage: login <username>".into(),
            ))
        }
    };
    if username.is_empty() {
        return Err(CommandError::InvalidArguments("Username is required".into()));
    }

    let Some(password) = read_password(context)? else {
        io::print_info("Login cancelled.");
        return Ok(());
    };

    let client = AuthClient::new(context.api.clone());
    let session = context.block_on(client.login(&username, &password))?;
    io::print_success(format!("Signed in as {}.", session.username()));
    context.session = Some(session);
    Ok(())
}

fn read_password(context: &ShellContext) -> Result<Option<String>, CommandError> {
    if context.mode == CliMode::Interactive {
        return io::prompt_password(&context.theme, "Password").map(Some);
    }
    // Scripts supply the password on the line after `login`.
    output::prompt("Password");
    match text_input("Password", None)? {
        TextPromptResult::Value(password) => Ok(Some(password)),
        _ => Ok(None),
    }
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.session.take() {
        Some(session) => io::print_success(format!("Signed out {}.", session.username())),
        None => io::print_info("No admin session is active."),
    }
    Ok(())
}
