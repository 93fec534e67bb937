use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry, signed_in: bool) {
    output_section("Available commands");
    for entry in registry.list() {
        let marker = if entry.admin_only && !signed_in {
            " (admin)"
        } else {
            ""
        };
        io::print_info(format!("  {:<12} {}{}", entry.name, entry.description, marker));
    }
    io::print_info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    io::print_info(format!("  Description: {}", entry.description));
    io::print_info(format!("  Usage: {}", entry.usage));
    if entry.admin_only {
        io::print_info("  Requires `login` first.");
    }
}
