pub mod commands;
pub mod context;
pub mod errors;
pub mod forms;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod ui;

pub use context::{CliMode, ShellContext};
pub use errors::{CliError, CommandError};
pub use shell::run_cli;
