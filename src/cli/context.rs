use std::future::Future;

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use tokio::runtime::{Builder, Runtime};

use crate::api::{AdminClient, AdminSession, ApiClient, ReferenceData, ReferenceDataLoader};
use crate::cli::commands;
use crate::cli::errors::{CliError, CommandError};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandRegistry;
use crate::config::{Config, ConfigManager};
use crate::currency::{CurrencyCode, LocaleConfig, MoneyFormat};
use crate::errors::DeskError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Flag accepted by destructive commands to skip the confirmation prompt.
pub const ASSUME_YES_FLAG: &str = "--yes";

/// State shared by every command for the lifetime of the shell.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub runtime: Runtime,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub api: ApiClient,
    pub money: MoneyFormat,
    pub reference: Option<ReferenceData>,
    pub session: Option<AdminSession>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_config_manager(mode, config_manager)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        let api = ApiClient::from_config(&config.clone().with_env_overrides())?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(DeskError::from)?;
        let money = MoneyFormat::new(
            CurrencyCode::new(config.currency.clone()),
            LocaleConfig::from_tag(&config.locale),
        );

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        tracing::debug!(api = %api.base_url(), ?mode, "shell context ready");

        Ok(Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            runtime,
            config_manager,
            config,
            api,
            money,
            reference: None,
            session: None,
            last_command: None,
            running: true,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        match &self.session {
            Some(session) => format!("donation-desk ({})> ", session.username()),
            None => "donation-desk> ".to_string(),
        }
    }

    pub fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(entry) = self.registry.get(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        if entry.admin_only && self.session.is_none() {
            return Err(CommandError::NotSignedIn);
        }
        let handler = entry.handler;
        tracing::debug!(command, args = args.len(), "dispatching command");
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub fn suggest_command(&self, input: &str) {
        io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        let needle = input.to_ascii_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (name, levenshtein(&needle, name)))
            .min_by_key(|(_, distance)| *distance);
        if let Some((name, distance)) = best {
            if distance <= 3 {
                io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    /// Reports a command failure. Only an unrecoverable output failure ends
    /// the shell.
    pub fn report_error(&mut self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::InvalidArguments(message) => {
                io::print_error(message);
                io::print_info("Use `help <command>` for usage details.");
            }
            CommandError::Api(api_err) if api_err.is_unauthorized() && self.session.is_some() => {
                api_err.log("admin request");
                self.session = None;
                io::print_error(api_err.user_message_or("Session rejected by the server."));
                io::print_info("Session cleared. Use `login <username>` to sign in again.");
            }
            CommandError::Api(api_err) => {
                api_err.log("command");
                io::print_error(api_err.user_message_or("Request failed."));
            }
            CommandError::ExitRequested => self.running = false,
            other => io::print_error(other),
        }
        Ok(())
    }

    pub fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        io::confirm_action(&self.theme, "Exit donation desk?", false).map_err(CliError::from)
    }

    /// Asks before a destructive action. Script mode never prompts: the
    /// action runs only with `--yes`.
    pub fn confirm_destructive(&self, prompt: &str, assume_yes: bool) -> Result<bool, CommandError> {
        if assume_yes {
            return Ok(true);
        }
        if self.mode == CliMode::Script {
            io::print_warning(format!(
                "{} Re-run with `{}` to confirm in script mode.",
                prompt, ASSUME_YES_FLAG
            ));
            return Ok(false);
        }
        io::confirm_action(&self.theme, prompt, false)
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Reference data from the last load, fetching it on first use.
    pub fn reference(&mut self) -> &ReferenceData {
        if self.reference.is_none() {
            self.refresh_reference();
        }
        self.reference.get_or_insert_with(ReferenceData::default)
    }

    /// Re-runs the reference fetches and prints one warning per failed slice.
    pub fn refresh_reference(&mut self) -> &ReferenceData {
        let loader = ReferenceDataLoader::new(self.api.clone());
        let data = self.block_on(loader.load());
        for warning in &data.warnings {
            output::notify(warning);
        }
        self.reference.insert(data)
    }

    pub fn admin(&self) -> Result<AdminClient, CommandError> {
        let session = self.session.clone().ok_or(CommandError::NotSignedIn)?;
        Ok(AdminClient::new(self.api.clone(), session))
    }

    pub fn print_warning(&self, message: &str) {
        io::print_warning(message);
    }

    /// Persists configuration changes and rebuilds the values derived from it.
    /// `config` is the stored configuration; environment overrides only reach the client.
    pub fn apply_config(&mut self, config: Config) -> Result<(), CommandError> {
        let api = ApiClient::from_config(&config.clone().with_env_overrides())?;
        self.config_manager.save(&config)?;
        self.money = MoneyFormat::new(
            CurrencyCode::new(config.currency.clone()),
            LocaleConfig::from_tag(&config.locale),
        );
        if api.base_url() != self.api.base_url() {
            self.reference = None;
            self.session = None;
        }
        self.api = api;
        self.config = config;
        Ok(())
    }
}

/// Splits `--yes` out of the argument list.
pub fn take_assume_yes<'a>(args: &[&'a str]) -> (bool, Vec<&'a str>) {
    let mut assume_yes = false;
    let rest = args
        .iter()
        .copied()
        .filter(|arg| {
            if *arg == ASSUME_YES_FLAG || *arg == "-y" {
                assume_yes = true;
                false
            } else {
                true
            }
        })
        .collect();
    (assume_yes, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assume_yes_is_extracted_anywhere() {
        let (yes, rest) = take_assume_yes(&["delete", "--yes", "12"]);
        assert!(yes);
        assert_eq!(rest, vec!["delete", "12"]);

        let (yes, rest) = take_assume_yes(&["delete", "12"]);
        assert!(!yes);
        assert_eq!(rest.len(), 2);
    }
}
