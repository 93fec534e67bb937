pub mod auth;
pub mod config;
pub mod donate;
pub mod donations;
pub mod links;
pub mod settings;
pub mod system;

use crate::cli::errors::CommandError;
use crate::cli::registry::CommandRegistry;
use crate::domain::RecordId;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let definitions = system::definitions()
        .into_iter()
        .chain(config::definitions())
        .chain(donate::definitions())
        .chain(auth::definitions())
        .chain(donations::definitions())
        .chain(links::definitions())
        .chain(settings::definitions());
    for entry in definitions {
        registry.register(entry);
    }
}

/// Splits `args` into a lowercase subcommand and the remaining arguments.
pub(crate) fn split_subcommand<'a>(args: &[&'a str], default: &str) -> (String, Vec<&'a str>) {
    match args.split_first() {
        Some((first, rest)) => (first.to_ascii_lowercase(), rest.to_vec()),
        None => (default.to_string(), Vec::new()),
    }
}

pub(crate) fn required_id(args: &[&str], usage: &str) -> Result<RecordId, CommandError> {
    args.first()
        .map(|raw| RecordId::new(raw.trim()))
        .filter(|id| !id.as_str().is_empty())
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}

/// Value following `flag`, e.g. `--search mary`.
pub(crate) fn flag_value<'a>(args: &[&'a str], flag: &str) -> Result<Option<&'a str>, CommandError> {
    match args.iter().position(|arg| *arg == flag) {
        Some(index) => args
            .get(index + 1)
            .copied()
            .map(Some)
            .ok_or_else(|| CommandError::InvalidArguments(format!("`{}` needs a value", flag))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcommand_defaults_when_missing() {
        let (sub, rest) = split_subcommand(&[], "list");
        assert_eq!(sub, "list");
        assert!(rest.is_empty());

        let (sub, rest) = split_subcommand(&["SHOW", "12"], "list");
        assert_eq!(sub, "show");
        assert_eq!(rest, vec!["12"]);
    }

    #[test]
    fn flag_values_are_looked_up_by_name() {
        let args = ["--status", "pending", "--search", "mary"];
        assert_eq!(flag_value(&args, "--search").unwrap(), Some("mary"));
        assert_eq!(flag_value(&args, "--limit").unwrap(), None);
        assert!(flag_value(&["--search"], "--search").is_err());
    }

    #[test]
    fn every_command_is_registered_once() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.names().collect();
        for expected in [
            "help", "version", "exit", "config", "pricing", "refresh", "donate", "login",
            "logout", "donations", "links", "settings",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        assert!(registry.get("donations").unwrap().admin_only);
        assert!(!registry.get("donate").unwrap().admin_only);
    }
}
