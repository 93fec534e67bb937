use std::collections::HashMap;

use crate::cli::context::ShellContext;
use crate::cli::errors::CommandResult;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    /// Dashboard commands need a signed-in session.
    pub admin_only: bool,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            admin_only: false,
        }
    }

    pub const fn admin(mut self) -> Self {
        self.admin_only = true;
        self
    }
}

/// Command table in registration order.
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    order: Vec<&'static str>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn register(&mut self, entry: CommandEntry) {
        let name = entry.name;
        if self.commands.insert(name, entry).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.commands.get(name).map(|entry| entry.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn keeps_registration_order_and_ignores_duplicates() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("help", "Show help", "help", noop));
        registry.register(CommandEntry::new("donate", "Start the form", "donate", noop));
        registry.register(CommandEntry::new("help", "Shadow", "help", noop));

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["help", "donate"]);
        assert_eq!(registry.get("help").map(|e| e.description), Some("Shadow"));
        assert!(registry.handler("missing").is_none());
    }

    #[test]
    fn admin_marker_is_opt_in() {
        let entry = CommandEntry::new("donations", "List", "donations", noop);
        assert!(!entry.admin_only);
        assert!(entry.admin().admin_only);
    }
}
