//! Error type of the command-line editor.

use thiserror::Error;

use classweave::ClassweaveError;

use crate::command::CommandError;

/// Errors raised while running the editor.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] ClassweaveError),

    /// A command line that could not be parsed, with the text its span
    /// points into.
    #[error("{err}")]
    Command { err: CommandError, src: String },
}

impl CliError {
    /// Create a new `Command` error with the associated source text.
    pub fn new_command_error(err: CommandError, src: impl Into<String>) -> Self {
        Self::Command {
            err,
            src: src.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::App(err.into())
    }
}
