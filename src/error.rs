use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("No command given")]
    MissingCommand,

    #[error("Unknown or unsupported command: {0}")]
    UnsupportedCommand(String),

    #[error("Unknown {command} subcommand: {subcommand}")]
    UnknownSubcommand { command: String, subcommand: String },

    /// A positional operand the command needs was not supplied.
    #[error("{command}: missing operand <{operand}>")]
    MissingOperand {
        command: String,
        operand: &'static str,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with something other than a REST reply envelope.
    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// Error reported by the store itself.
    #[error("{0}")]
    Remote(String),
}
