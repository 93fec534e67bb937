use std::io;

use thiserror::Error;

use crate::api::ApiError;
use crate::core::attachment::AttachmentError;
use crate::errors::DeskError;

pub type CommandResult = Result<(), CommandError>;

/// Failure of a single shell command. Reported, never fatal to the shell.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Not signed in. Use `login <username>` first.")]
    NotSignedIn,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
    #[error(transparent)]
    Desk(#[from] DeskError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Errors that end the shell itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Desk(#[from] DeskError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::InvalidArguments(message) => CliError::Input(message),
            CommandError::Desk(err) => CliError::Desk(err),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Desk(DeskError::Io(err))
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        match err {
            rustyline::error::ReadlineError::Io(err) => CliError::Desk(DeskError::Io(err)),
            other => CliError::Command(other.to_string()),
        }
    }
}
